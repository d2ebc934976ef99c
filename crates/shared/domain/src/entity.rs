//! Entities: companies, organizations, or single-contact placeholders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_WEBSITE_SCHEME;

/// Postal fields shared by entities and contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostalAddress {
    pub address: String,
    pub address2: String,
    pub address3: String,
    pub zip_code: String,
    pub cedex: String,
    pub city_id: Option<Uuid>,
}

/// Creation and modification stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Audit {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub last_modified_by: Option<Uuid>,
}

impl Audit {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
            created_by: None,
            last_modified_by: None,
        }
    }
}

impl Default for Audit {
    fn default() -> Self {
        Self::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRole {
    pub id: Uuid,
    pub name: String,
}

/// A company or organization owning contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub entity_type_id: Option<Uuid>,
    pub relationship_date: Option<NaiveDate>,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub website: String,
    pub notes: String,
    pub postal: PostalAddress,
    /// Import that created this entity
    pub imported_by: Option<Uuid>,
    /// Placeholder entity holding exactly one person
    pub is_single_contact: bool,
    pub audit: Audit,
}

impl Entity {
    /// A blank entity with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            entity_type_id: None,
            relationship_date: None,
            phone: String::new(),
            fax: String::new(),
            email: String::new(),
            website: String::new(),
            notes: String::new(),
            postal: PostalAddress::default(),
            imported_by: None,
            is_single_contact: false,
            audit: Audit::now(),
        }
    }

    /// A single-contact placeholder entity.
    pub fn single_contact(name: impl Into<String>) -> Self {
        Self {
            is_single_contact: true,
            ..Self::new(name)
        }
    }

    /// Prefix the website with `http://` when it lacks a scheme.
    pub fn normalize_website(&mut self) {
        self.website = normalize_website(&self.website);
    }
}

pub fn normalize_website(website: &str) -> String {
    let website = website.trim();
    if website.is_empty() || website.contains("://") {
        website.to_string()
    } else {
        format!("{}{}", DEFAULT_WEBSITE_SCHEME, website)
    }
}

/// Minimal view of a contact used to enforce entity save rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberState {
    pub contact_id: Uuid,
    pub lastname: String,
    pub firstname: String,
    pub main_contact: bool,
    pub has_left: bool,
}

/// Corrections to apply after saving an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFixup {
    /// No active contact: create a blank main contact
    pub create_default_contact: bool,
    /// No active main contact: promote this one
    pub promote_main: Option<Uuid>,
    /// New name of a single-contact entity
    pub single_contact_name: Option<String>,
}

impl EntityFixup {
    pub fn is_empty(&self) -> bool {
        !self.create_default_contact && self.promote_main.is_none() && self.single_contact_name.is_none()
    }

    /// Compute the fixes an entity needs given its members, in creation order.
    pub fn compute(entity: &Entity, members: &[MemberState]) -> Self {
        let active: Vec<&MemberState> = members.iter().filter(|m| !m.has_left).collect();
        let mut fixup = EntityFixup::default();

        if active.is_empty() {
            fixup.create_default_contact = true;
        } else if !active.iter().any(|m| m.main_contact) {
            fixup.promote_main = active.first().map(|m| m.contact_id);
        }

        if entity.is_single_contact {
            let name = members
                .first()
                .map(|m| format!("{} {}", m.lastname, m.firstname).trim().to_lowercase())
                .unwrap_or_default();
            if name != entity.name {
                fixup.single_contact_name = Some(name);
            }
        }
        fixup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(lastname: &str, main_contact: bool, has_left: bool) -> MemberState {
        MemberState {
            contact_id: Uuid::new_v4(),
            lastname: lastname.to_string(),
            firstname: String::new(),
            main_contact,
            has_left,
        }
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("www.sanza.fr"), "http://www.sanza.fr");
        assert_eq!(normalize_website("https://sanza.fr"), "https://sanza.fr");
        assert_eq!(normalize_website(""), "");
    }

    #[test]
    fn test_entity_without_contacts_gets_default_contact() {
        let entity = Entity::new("Acme");
        let fixup = EntityFixup::compute(&entity, &[member("Left", true, true)]);
        assert!(fixup.create_default_contact);
        assert!(fixup.promote_main.is_none());
    }

    #[test]
    fn test_first_active_contact_is_promoted() {
        let entity = Entity::new("Acme");
        let members = vec![member("Gone", true, true), member("Dupond", false, false), member("Durand", false, false)];
        let fixup = EntityFixup::compute(&entity, &members);
        assert_eq!(fixup.promote_main, Some(members[1].contact_id));
    }

    #[test]
    fn test_single_contact_entity_is_renamed() {
        let entity = Entity::single_contact("");
        let mut pierre = member("Dupond", true, false);
        pierre.firstname = "Pierre".to_string();
        let fixup = EntityFixup::compute(&entity, &[pierre]);
        assert_eq!(fixup.single_contact_name.as_deref(), Some("dupond pierre"));
    }

    #[test]
    fn test_consistent_entity_needs_nothing() {
        let entity = Entity::new("Acme");
        assert!(EntityFixup::compute(&entity, &[member("Dupond", true, false)]).is_empty());
    }
}
