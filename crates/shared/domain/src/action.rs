//! Actions (tasks, events) and their done lifecycle.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub id: Uuid,
    pub name: String,
    /// Reaching this status closes the action
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionType {
    pub id: Uuid,
    pub name: String,
    pub allowed_status_ids: Vec<Uuid>,
    /// Number new actions of this type automatically
    pub number_auto_generated: bool,
    pub last_number: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ActionPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl From<ActionPriority> for i32 {
    fn from(priority: ActionPriority) -> Self {
        priority as i32
    }
}

impl TryFrom<i32> for ActionPriority {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ActionPriority::Low),
            2 => Ok(ActionPriority::Medium),
            3 => Ok(ActionPriority::High),
            other => Err(format!("Invalid priority {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Action {
    pub id: Uuid,
    pub subject: String,
    pub planned_date: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub type_id: Option<Uuid>,
    pub detail: String,
    #[cfg_attr(feature = "openapi", schema(value_type = i32))]
    pub priority: ActionPriority,
    pub opportunity_id: Option<Uuid>,
    pub done: bool,
    pub done_date: Option<DateTime<Utc>>,
    /// Team member in charge
    pub in_charge_id: Option<Uuid>,
    pub archived: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub amount: Option<Decimal>,
    pub number: i32,
    pub status_id: Option<Uuid>,
    pub contact_ids: Vec<Uuid>,
    pub entity_ids: Vec<Uuid>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Action {
    pub fn new(subject: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            planned_date: None,
            end_datetime: None,
            type_id: None,
            detail: String::new(),
            priority: ActionPriority::Medium,
            opportunity_id: None,
            done: false,
            done_date: None,
            in_charge_id: None,
            archived: false,
            amount: None,
            number: 0,
            status_id: None,
            contact_ids: Vec::new(),
            entity_ids: Vec::new(),
            created: now,
            modified: now,
        }
    }

    /// Align `done` and `done_date` with the status before saving.
    ///
    /// A final status closes the action. Otherwise the action is reopened when
    /// its type has some final status. `done_date` is stamped (to the minute)
    /// or cleared to match.
    pub fn apply_done_rules(
        &mut self,
        status: Option<&ActionStatus>,
        type_has_final_status: bool,
        now: DateTime<Utc>,
    ) {
        if status.is_some_and(|s| s.is_final) {
            self.done = true;
        } else if type_has_final_status {
            self.done = false;
        }

        if self.done && self.done_date.is_none() {
            self.done_date = Some(round_to_minute(now));
        } else if !self.done && self.done_date.is_some() {
            self.done_date = None;
        }
    }

    /// Assign the next number of an auto-numbered type to a fresh action.
    /// Returns the updated type when its counter moved.
    pub fn assign_number(&mut self, action_type: &ActionType) -> Option<ActionType> {
        if self.number != 0 || !action_type.number_auto_generated {
            return None;
        }
        let mut updated = action_type.clone();
        updated.last_number += 1;
        self.number = updated.last_number;
        Some(updated)
    }
}

/// Truncate to the minute.
pub fn round_to_minute(datetime: DateTime<Utc>) -> DateTime<Utc> {
    datetime
        .duration_trunc(TimeDelta::minutes(1))
        .unwrap_or(datetime)
}

/// Current time truncated to the minute.
pub fn now_rounded() -> DateTime<Utc> {
    round_to_minute(Utc::now())
}
