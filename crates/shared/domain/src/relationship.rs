use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A kind of link between two contacts, optionally directed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipType {
    pub id: Uuid,
    pub name: String,
    /// Label of the reverse direction; empty for symmetric types
    pub reverse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: Uuid,
    pub relationship_type_id: Uuid,
    pub contact1_id: Uuid,
    pub contact2_id: Uuid,
    pub created: DateTime<Utc>,
}
