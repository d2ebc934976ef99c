//! Mailing-list subscriptions and the per-type field list derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SUBSCRIPTION_FIELD_PREFIX;
use crate::text::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionType {
    pub id: Uuid,
    pub name: String,
    pub order_index: i32,
}

/// Opt-in or opt-out of a contact for one subscription type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub subscription_type_id: Uuid,
    pub accept_subscription: bool,
    pub subscription_date: Option<DateTime<Utc>>,
    pub unsubscription_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// A fresh opt-in dated `now`.
    pub fn accepted(contact_id: Uuid, subscription_type_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            subscription_type_id,
            accept_subscription: true,
            subscription_date: Some(now),
            unsubscription_date: None,
        }
    }

    pub fn unsubscribe(&mut self, now: DateTime<Utc>) {
        self.accept_subscription = false;
        self.unsubscription_date = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Checkbox,
    Text,
}

/// A configuration-driven field, one per subscription type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub subscription_type_id: Uuid,
}

/// `accept_<slug>` key of a subscription type.
pub fn subscription_field_name(subscription_type: &SubscriptionType) -> String {
    format!("{}{}", SUBSCRIPTION_FIELD_PREFIX, slugify(&subscription_type.name))
}

/// Field list for the given types, ordered by `order_index`.
pub fn subscription_fields(types: &[SubscriptionType]) -> Vec<SubscriptionField> {
    let mut ordered: Vec<&SubscriptionType> = types.iter().collect();
    ordered.sort_by_key(|t| t.order_index);
    ordered
        .into_iter()
        .map(|t| SubscriptionField {
            key: subscription_field_name(t),
            label: t.name.clone(),
            kind: FieldKind::Checkbox,
            subscription_type_id: t.id,
        })
        .collect()
}
