//! Result shapes returned by the search service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::evaluator::Hit;
use super::query::SearchQuery;

/// A matched contact as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContactHit {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub entity_name: String,
    pub lastname: String,
    pub firstname: String,
    pub fullname: String,
    /// Contact email, else the entity email
    pub email: String,
    pub phone: String,
    pub has_left: bool,
}

impl From<Hit<'_>> for ContactHit {
    fn from(hit: Hit<'_>) -> Self {
        Self {
            id: hit.contact.id,
            entity_id: hit.entity.id,
            entity_name: hit.entity.name.clone(),
            lastname: hit.contact.lastname.clone(),
            firstname: hit.contact.firstname.clone(),
            fullname: hit.contact.fullname(),
            email: hit.email().to_string(),
            phone: hit.contact.effective_phone(hit.entity).to_string(),
            has_left: hit.contact.has_left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EntityHit {
    pub id: Uuid,
    pub name: String,
    /// All matching contacts of the entity have left
    pub is_empty: bool,
    pub contacts: Vec<ContactHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EntityResults {
    pub entities: Vec<EntityHit>,
    pub contacts_count: usize,
    pub has_empty_entities: bool,
}

fn is_visible(hit: &Hit<'_>, with_left: bool) -> bool {
    with_left || !hit.contact.has_left
}

fn not_excluded<'d>(hits: Vec<Hit<'d>>, query: &SearchQuery) -> Vec<Hit<'d>> {
    hits.into_iter()
        .filter(|hit| !query.excluded.contains(&hit.contact.id))
        .collect()
}

/// Flat list without left and excluded contacts.
pub fn contacts(hits: Vec<Hit<'_>>, query: &SearchQuery) -> Vec<ContactHit> {
    let with_left = query.includes_left_contacts();
    not_excluded(hits, query)
        .into_iter()
        .filter(|hit| is_visible(hit, with_left))
        .map(ContactHit::from)
        .collect()
}

/// `"fullname" <email>` lines, skipping contacts without an email.
pub fn emails(hits: Vec<Hit<'_>>, query: &SearchQuery) -> Vec<String> {
    let with_left = query.includes_left_contacts();
    not_excluded(hits, query)
        .into_iter()
        .filter(|hit| is_visible(hit, with_left) && !hit.email().is_empty())
        .map(|hit| hit.contact.email_address(hit.entity))
        .collect()
}

/// Matches grouped by entity, entities by name and contacts by lastname.
pub fn by_entity(hits: Vec<Hit<'_>>, query: &SearchQuery) -> EntityResults {
    let with_left = query.includes_left_contacts();
    let mut order: Vec<Uuid> = Vec::new();
    let mut entities: HashMap<Uuid, EntityHit> = HashMap::new();
    let mut contacts_count = 0;

    for hit in not_excluded(hits, query) {
        let entry = entities.entry(hit.entity.id).or_insert_with(|| {
            order.push(hit.entity.id);
            EntityHit {
                id: hit.entity.id,
                name: hit.entity.name.clone(),
                is_empty: true,
                contacts: Vec::new(),
            }
        });
        if is_visible(&hit, with_left) {
            entry.is_empty = false;
            entry.contacts.push(ContactHit::from(hit));
            contacts_count += 1;
        }
    }

    let mut entities: Vec<EntityHit> = order
        .into_iter()
        .filter_map(|id| entities.remove(&id))
        .map(|mut entity| {
            entity
                .contacts
                .sort_by_cached_key(|c| c.lastname.to_lowercase());
            entity
        })
        .collect();
    entities.sort_by(|a, b| a.name.cmp(&b.name));

    EntityResults {
        has_empty_entities: entities.iter().any(|e| e.is_empty),
        entities,
        contacts_count,
    }
}
