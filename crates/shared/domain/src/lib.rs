//! Domain layer - Core CRM records and the invariants they enforce.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Persistence lives in the crm-service crate, which converts its database
//! models into these types.

pub mod action;
pub mod constants;
pub mod contact;
pub mod contacts_import;
pub mod custom_field;
pub mod entity;
pub mod error;
pub mod group;
pub mod opportunity;
pub mod relationship;
pub mod subscription;
pub mod text;
pub mod zone;

pub use action::{Action, ActionPriority, ActionStatus, ActionType};
pub use constants::*;
pub use contact::{plan_same_as_removal, Contact, Gender, SameAsUpdate};
pub use contacts_import::{split_email, ContactsImport, EmailParts, ImportEncoding};
pub use custom_field::{CustomField, CustomFieldModel, CustomFieldValue};
pub use entity::{Audit, Entity, EntityFixup, EntityRole, EntityType, MemberState, PostalAddress};
pub use error::{DomainError, DomainResult};
pub use group::Group;
pub use opportunity::Opportunity;
pub use relationship::{Relationship, RelationshipType};
pub use subscription::{
    subscription_field_name, subscription_fields, FieldKind, Subscription, SubscriptionField,
    SubscriptionType,
};
pub use zone::{format_city_name, City, CityFormatter, NewZone, Zone, ZoneIndex, ZoneType};
