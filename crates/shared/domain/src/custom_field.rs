use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record kind a custom field extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CustomFieldModel {
    Entity = 1,
    Contact = 2,
}

impl From<CustomFieldModel> for i32 {
    fn from(model: CustomFieldModel) -> Self {
        model as i32
    }
}

impl TryFrom<i32> for CustomFieldModel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CustomFieldModel::Entity),
            2 => Ok(CustomFieldModel::Contact),
            other => Err(format!("Invalid custom field model {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: Uuid,
    pub model: CustomFieldModel,
    pub name: String,
    pub label: String,
    pub widget: String,
    pub ordering: i32,
    /// 1-based import column position; 0 when not imported
    pub import_order: i32,
    pub export_order: i32,
    pub is_link: bool,
}

/// Value of a custom field on an entity or a contact (`owner_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub custom_field_id: Uuid,
    pub owner_id: Uuid,
    pub value: String,
}
