//! Contacts and the same-as links between duplicate persons.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNKNOWN_NAME;
use crate::entity::{Audit, Entity, PostalAddress};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Gender {
    #[default]
    NotSet = 0,
    Male = 1,
    Female = 2,
    Couple = 3,
}

impl Gender {
    /// Courtesy title
    pub fn label(&self) -> &'static str {
        match self {
            Gender::NotSet => "",
            Gender::Male => "Mr",
            Gender::Female => "Mrs",
            Gender::Couple => "Mrs and Mr",
        }
    }
}

impl From<Gender> for i32 {
    fn from(gender: Gender) -> Self {
        gender as i32
    }
}

impl TryFrom<i32> for Gender {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gender::NotSet),
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            3 => Ok(Gender::Couple),
            other => Err(format!("Invalid gender {}", other)),
        }
    }
}

/// A person, always attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contact {
    pub id: Uuid,
    pub entity_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = i32))]
    pub gender: Gender,
    /// Overrides the gender label when set
    pub gender_title: String,
    pub title: String,
    pub lastname: String,
    pub firstname: String,
    pub nickname: String,
    pub birth_date: Option<NaiveDate>,
    pub job: String,
    pub main_contact: bool,
    pub accept_notifications: bool,
    pub email_verified: bool,
    pub phone: String,
    pub mobile: String,
    pub email: String,
    pub notes: String,
    pub same_as_id: Option<Uuid>,
    pub same_as_priority: i32,
    pub has_left: bool,
    pub imported_by: Option<Uuid>,
    pub favorite_language: String,
    pub postal: PostalAddress,
    pub role_ids: Vec<Uuid>,
    pub audit: Audit,
}

impl Contact {
    /// A blank main contact of the given entity.
    pub fn new(entity_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_id,
            gender: Gender::NotSet,
            gender_title: String::new(),
            title: String::new(),
            lastname: String::new(),
            firstname: String::new(),
            nickname: String::new(),
            birth_date: None,
            job: String::new(),
            main_contact: true,
            accept_notifications: true,
            email_verified: false,
            phone: String::new(),
            mobile: String::new(),
            email: String::new(),
            notes: String::new(),
            same_as_id: None,
            same_as_priority: 0,
            has_left: false,
            imported_by: None,
            favorite_language: String::new(),
            postal: PostalAddress::default(),
            role_ids: Vec::new(),
            audit: Audit::now(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.firstname.is_empty() || !self.lastname.is_empty()
    }

    fn gender_text(&self) -> &str {
        if !self.gender_title.is_empty() {
            &self.gender_title
        } else {
            self.gender.label()
        }
    }

    /// "Title First Last", the email without names, else "< Unknown >".
    pub fn fullname(&self) -> String {
        if !self.has_name() {
            let email = self.email.trim();
            return if email.is_empty() {
                UNKNOWN_NAME.to_string()
            } else {
                email.to_string()
            };
        }

        let title = if self.gender != Gender::NotSet && !self.lastname.is_empty() {
            format!("{} ", self.gender_text())
        } else {
            String::new()
        };
        let name = if self.firstname.is_empty() || self.lastname.is_empty() {
            format!("{}{}", self.firstname, self.lastname)
        } else {
            format!("{} {}", self.firstname, self.lastname)
        };
        format!("{}{}", title, name).trim().to_string()
    }

    pub fn effective_email<'a>(&'a self, entity: &'a Entity) -> &'a str {
        if self.email.is_empty() {
            &entity.email
        } else {
            &self.email
        }
    }

    pub fn effective_phone<'a>(&'a self, entity: &'a Entity) -> &'a str {
        if self.phone.is_empty() {
            &entity.phone
        } else {
            &self.phone
        }
    }

    fn has_own_postal(&self) -> bool {
        let p = &self.postal;
        !(p.address.is_empty()
            && p.address2.is_empty()
            && p.address3.is_empty()
            && p.zip_code.is_empty()
            && p.cedex.is_empty()
            && p.city_id.is_none())
    }

    /// The contact address if any of its fields is set, else the entity one.
    pub fn effective_postal<'a>(&'a self, entity: &'a Entity) -> &'a PostalAddress {
        if self.has_own_postal() {
            &self.postal
        } else {
            &entity.postal
        }
    }

    pub fn effective_zip_code<'a>(&'a self, entity: &'a Entity) -> &'a str {
        &self.effective_postal(entity).zip_code
    }

    pub fn effective_city_id(&self, entity: &Entity) -> Option<Uuid> {
        self.effective_postal(entity).city_id
    }

    /// `"fullname" <email>` or the bare email for unnamed contacts.
    pub fn email_address(&self, entity: &Entity) -> String {
        let email = self.effective_email(entity);
        if self.has_name() {
            format!("\"{}\" <{}>", self.fullname(), email)
        } else {
            email.to_string()
        }
    }
}

/// What happens to a same-as group when one of its contacts goes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SameAsUpdate {
    /// Remaining contacts with their new contiguous priorities
    Renumber(Vec<(Uuid, i32)>),
    /// The group falls apart; these contacts lose their link
    Dissolve(Vec<Uuid>),
}

/// Plan the same-as update for removing `removed` from a group.
///
/// `members` holds `(contact_id, priority)` for every contact of the group.
pub fn plan_same_as_removal(removed: Uuid, members: &[(Uuid, i32)]) -> SameAsUpdate {
    let mut remaining: Vec<(Uuid, i32)> = members
        .iter()
        .copied()
        .filter(|(id, _)| *id != removed)
        .collect();

    if remaining.len() > 1 {
        remaining.sort_by_key(|(_, priority)| *priority);
        SameAsUpdate::Renumber(
            remaining
                .into_iter()
                .enumerate()
                .map(|(index, (id, _))| (id, index as i32 + 1))
                .collect(),
        )
    } else {
        SameAsUpdate::Dissolve(remaining.into_iter().map(|(id, _)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(firstname: &str, lastname: &str, email: &str) -> Contact {
        let mut contact = Contact::new(Uuid::new_v4());
        contact.firstname = firstname.to_string();
        contact.lastname = lastname.to_string();
        contact.email = email.to_string();
        contact
    }

    #[test]
    fn test_fullname() {
        let mut pierre = contact("Pierre", "Dupond", "");
        assert_eq!(pierre.fullname(), "Pierre Dupond");
        pierre.gender = Gender::Male;
        assert_eq!(pierre.fullname(), "Mr Pierre Dupond");
        pierre.gender_title = "Dr".to_string();
        assert_eq!(pierre.fullname(), "Dr Pierre Dupond");

        assert_eq!(contact("", "", " a@b.fr ").fullname(), "a@b.fr");
        assert_eq!(contact("", "", "").fullname(), "< Unknown >");
        assert_eq!(contact("Pierre", "", "").fullname(), "Pierre");
    }

    #[test]
    fn test_email_falls_back_to_entity() {
        let mut entity = Entity::new("Acme");
        entity.email = "contact@acme.fr".to_string();
        let pierre = contact("Pierre", "Dupond", "");
        assert_eq!(pierre.effective_email(&entity), "contact@acme.fr");
        assert_eq!(pierre.email_address(&entity), "\"Pierre Dupond\" <contact@acme.fr>");

        let anonymous = contact("", "", "x@y.fr");
        assert_eq!(anonymous.email_address(&entity), "x@y.fr");
    }

    #[test]
    fn test_postal_falls_back_to_entity() {
        let mut entity = Entity::new("Acme");
        entity.postal.zip_code = "42000".to_string();
        let mut pierre = contact("Pierre", "Dupond", "");
        assert_eq!(pierre.effective_zip_code(&entity), "42000");
        pierre.postal.address = "1 rue".to_string();
        assert_eq!(pierre.effective_zip_code(&entity), "");
    }

    #[test]
    fn test_same_as_renumbered() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let update = plan_same_as_removal(a, &[(a, 1), (c, 3), (b, 2)]);
        assert_eq!(update, SameAsUpdate::Renumber(vec![(b, 1), (c, 2)]));
    }

    #[test]
    fn test_same_as_dissolved() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(plan_same_as_removal(a, &[(a, 1), (b, 2)]), SameAsUpdate::Dissolve(vec![b]));
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::try_from(3), Ok(Gender::Couple));
        assert!(Gender::try_from(7).is_err());
        assert_eq!(i32::from(Gender::Female), 2);
    }
}
