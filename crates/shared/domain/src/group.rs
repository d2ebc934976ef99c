use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named set of entities and contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    /// Unique, stored trimmed
    pub name: String,
    pub description: String,
    pub subscribe_form: bool,
    pub entity_ids: Vec<Uuid>,
    pub contact_ids: Vec<Uuid>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: String::new(),
            subscribe_form: false,
            entity_ids: Vec::new(),
            contact_ids: Vec::new(),
        }
    }

    pub fn has_entity(&self, entity_id: Uuid) -> bool {
        self.entity_ids.contains(&entity_id)
    }

    pub fn has_contact(&self, contact_id: Uuid) -> bool {
        self.contact_ids.contains(&contact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name_is_trimmed() {
        assert_eq!(Group::new("  Newsletter ").name, "Newsletter");
    }
}
