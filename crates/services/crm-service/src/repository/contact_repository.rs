//! Contact, role and same-as repository.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::directory::{contact, contact_role, entity, entity_role, same_as};
use super::{lower_eq, DbHandle};
use common::{AppError, AppResult};
use domain::{Contact, EntityRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn get_contact(&self, id: Uuid) -> AppResult<Option<Contact>>;

    /// Contact of an entity with exactly these names
    async fn find_contact(
        &self,
        entity_id: Uuid,
        firstname: &str,
        lastname: &str,
    ) -> AppResult<Option<Contact>>;

    /// Contact with exactly these names living in a single-contact entity
    async fn find_single_contact(&self, firstname: &str, lastname: &str) -> AppResult<Option<Contact>>;

    /// Contacts of an entity, oldest first
    async fn list_entity_contacts(&self, entity_id: Uuid) -> AppResult<Vec<Contact>>;

    /// Insert or update a contact and its roles
    async fn save_contact(&self, contact: &Contact) -> AppResult<Contact>;

    async fn delete_contact(&self, id: Uuid) -> AppResult<()>;

    /// Role named `name`, ignoring case
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<EntityRole>>;

    async fn create_role(&self, name: String) -> AppResult<EntityRole>;

    /// `(contact_id, priority)` of every contact linked to a same-as
    async fn same_as_members(&self, same_as_id: Uuid) -> AppResult<Vec<(Uuid, i32)>>;

    /// Update the same-as link and priority of a contact
    async fn set_same_as(&self, contact_id: Uuid, same_as_id: Option<Uuid>, priority: i32) -> AppResult<()>;

    async fn delete_same_as(&self, same_as_id: Uuid) -> AppResult<()>;

    /// Contacts with these names, ignoring case
    async fn find_contacts_by_names(&self, lastname: &str, firstname: &str) -> AppResult<Vec<Contact>>;

    /// Contacts whose own or entity email is `email`, ignoring case
    async fn find_contacts_by_any_email(&self, email: &str) -> AppResult<Vec<Contact>>;

    /// Contacts whose own email is exactly `email`
    async fn find_contacts_by_email(&self, email: &str) -> AppResult<Vec<Contact>>;
}

/// SeaORM implementation of ContactRepository
pub struct ContactStore<H = DatabaseConnection> {
    db: H,
}

impl<H: DbHandle> ContactStore<H> {
    pub fn new(db: H) -> Self {
        Self { db }
    }

    /// Attach role ids to loaded contact rows.
    async fn with_roles(&self, models: Vec<contact::Model>) -> AppResult<Vec<Contact>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut roles: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in contact_role::Entity::find()
            .filter(contact_role::Column::ContactId.is_in(ids))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
        {
            roles.entry(link.contact_id).or_default().push(link.role_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let role_ids = roles.remove(&model.id).unwrap_or_default();
                Contact {
                    role_ids,
                    ..Contact::from(model)
                }
            })
            .collect())
    }

    async fn first_with_roles(&self, model: Option<contact::Model>) -> AppResult<Option<Contact>> {
        match model {
            Some(model) => Ok(self.with_roles(vec![model]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<H: DbHandle> ContactRepository for ContactStore<H> {
    async fn get_contact(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let model = contact::Entity::find_by_id(id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.first_with_roles(model).await
    }

    async fn find_contact(
        &self,
        entity_id: Uuid,
        firstname: &str,
        lastname: &str,
    ) -> AppResult<Option<Contact>> {
        let model = contact::Entity::find()
            .filter(contact::Column::EntityId.eq(entity_id))
            .filter(contact::Column::Firstname.eq(firstname))
            .filter(contact::Column::Lastname.eq(lastname))
            .order_by_asc(contact::Column::Created)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.first_with_roles(model).await
    }

    async fn find_single_contact(&self, firstname: &str, lastname: &str) -> AppResult<Option<Contact>> {
        let candidates = contact::Entity::find()
            .filter(contact::Column::Firstname.eq(firstname))
            .filter(contact::Column::Lastname.eq(lastname))
            .order_by_asc(contact::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let single_entities: HashSet<Uuid> = entity::Entity::find()
            .filter(entity::Column::Id.is_in(candidates.iter().map(|c| c.entity_id)))
            .filter(entity::Column::IsSingleContact.eq(true))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let model = candidates
            .into_iter()
            .find(|c| single_entities.contains(&c.entity_id));
        self.first_with_roles(model).await
    }

    async fn list_entity_contacts(&self, entity_id: Uuid) -> AppResult<Vec<Contact>> {
        let models = contact::Entity::find()
            .filter(contact::Column::EntityId.eq(entity_id))
            .order_by_asc(contact::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.with_roles(models).await
    }

    async fn save_contact(&self, crm_contact: &Contact) -> AppResult<Contact> {
        let exists = contact::Entity::find_by_id(crm_contact.id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .is_some();

        let mut active_model = contact::ActiveModel::from(crm_contact);
        active_model.modified = Set(chrono::Utc::now());

        let model = if exists {
            active_model.update(self.db.conn()).await
        } else {
            active_model.insert(self.db.conn()).await
        }
        .map_err(AppError::from)?;

        contact_role::Entity::delete_many()
            .filter(contact_role::Column::ContactId.eq(crm_contact.id))
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        let mut seen = HashSet::new();
        let role_ids: Vec<Uuid> = crm_contact
            .role_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if !role_ids.is_empty() {
            let links = role_ids.iter().map(|role_id| contact_role::ActiveModel {
                contact_id: Set(crm_contact.id),
                role_id: Set(*role_id),
            });
            contact_role::Entity::insert_many(links)
                .exec(self.db.conn())
                .await
                .map_err(AppError::from)?;
        }

        Ok(Contact {
            role_ids,
            ..Contact::from(model)
        })
    }

    async fn delete_contact(&self, id: Uuid) -> AppResult<()> {
        let result = contact::Entity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Contact"));
        }
        Ok(())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<EntityRole>> {
        let model = entity_role::Entity::find()
            .filter(lower_eq(entity_role::Column::Name, name))
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(model.map(EntityRole::from))
    }

    async fn create_role(&self, name: String) -> AppResult<EntityRole> {
        let active_model = entity_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(EntityRole::from(model))
    }

    async fn same_as_members(&self, same_as_id: Uuid) -> AppResult<Vec<(Uuid, i32)>> {
        let models = contact::Entity::find()
            .filter(contact::Column::SameAsId.eq(same_as_id))
            .order_by_asc(contact::Column::SameAsPriority)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| (m.id, m.same_as_priority)).collect())
    }

    async fn set_same_as(&self, contact_id: Uuid, same_as_id: Option<Uuid>, priority: i32) -> AppResult<()> {
        let model = contact::Entity::find_by_id(contact_id)
            .one(self.db.conn())
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Contact"))?;

        let mut active: contact::ActiveModel = model.into();
        active.same_as_id = Set(same_as_id);
        active.same_as_priority = Set(priority);
        active.update(self.db.conn()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete_same_as(&self, same_as_id: Uuid) -> AppResult<()> {
        same_as::Entity::delete_by_id(same_as_id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn find_contacts_by_names(&self, lastname: &str, firstname: &str) -> AppResult<Vec<Contact>> {
        let models = contact::Entity::find()
            .filter(lower_eq(contact::Column::Lastname, lastname))
            .filter(lower_eq(contact::Column::Firstname, firstname))
            .order_by_asc(contact::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.with_roles(models).await
    }

    async fn find_contacts_by_any_email(&self, email: &str) -> AppResult<Vec<Contact>> {
        let entity_ids: Vec<Uuid> = entity::Entity::find()
            .filter(lower_eq(entity::Column::Email, email))
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let mut condition = Condition::any().add(lower_eq(contact::Column::Email, email));
        if !entity_ids.is_empty() {
            condition = condition.add(contact::Column::EntityId.is_in(entity_ids));
        }

        let models = contact::Entity::find()
            .filter(condition)
            .order_by_asc(contact::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.with_roles(models).await
    }

    async fn find_contacts_by_email(&self, email: &str) -> AppResult<Vec<Contact>> {
        let models = contact::Entity::find()
            .filter(contact::Column::Email.eq(email))
            .order_by_asc(contact::Column::Created)
            .all(self.db.conn())
            .await
            .map_err(AppError::from)?;

        self.with_roles(models).await
    }
}
