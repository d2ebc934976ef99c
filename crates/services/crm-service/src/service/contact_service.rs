//! Contact service - contact deletion, same-as suggestions and entity saves.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::infra::UnitOfWork;
use crate::repository::{ContactRepository, EntityRepository};
use common::{AppResult, OptionExt};
use domain::{plan_same_as_removal, Contact, Entity, EntityFixup, MemberState, SameAsUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Save an entity, then repair its contacts and name.
///
/// Every entity keeps an active main contact, and single-contact entities
/// are named after their person.
pub async fn save_entity_with_rules(
    entities: &dyn EntityRepository,
    contacts: &dyn ContactRepository,
    entity: &Entity,
) -> AppResult<Entity> {
    let mut entity = entity.clone();
    entity.normalize_website();
    let saved = entities.save_entity(&entity).await?;

    let members = contacts.list_entity_contacts(saved.id).await?;
    let states: Vec<MemberState> = members
        .iter()
        .map(|c| MemberState {
            contact_id: c.id,
            lastname: c.lastname.clone(),
            firstname: c.firstname.clone(),
            main_contact: c.main_contact,
            has_left: c.has_left,
        })
        .collect();

    let fixup = EntityFixup::compute(&saved, &states);
    if fixup.is_empty() {
        return Ok(saved);
    }

    if fixup.create_default_contact {
        tracing::debug!("Entity {} has no active contact, creating one", saved.id);
        contacts.save_contact(&Contact::new(saved.id)).await?;
    }
    if let Some(promoted) = fixup.promote_main {
        if let Some(mut contact) = members.into_iter().find(|c| c.id == promoted) {
            contact.main_contact = true;
            contacts.save_contact(&contact).await?;
        }
    }
    match fixup.single_contact_name {
        Some(name) => {
            let renamed = Entity { name, ..saved };
            entities.save_entity(&renamed).await
        }
        None => Ok(saved),
    }
}

/// Contact service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Delete a contact and repair the same-as group it belonged to
    async fn delete_contact(&self, id: Uuid) -> AppResult<()>;

    /// Contacts that may be the same person
    async fn suggested_same_as(
        &self,
        contact_id: Option<Uuid>,
        lastname: &str,
        firstname: &str,
        email: &str,
    ) -> AppResult<Vec<Contact>>;

    async fn save_entity(&self, entity: Entity) -> AppResult<Entity>;
}

/// Concrete implementation of ContactService using Unit of Work.
pub struct ContactManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ContactManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ContactService for ContactManager<U> {
    async fn delete_contact(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let contacts = ctx.contacts();
                    let contact = contacts.get_contact(id).await?.ok_or_not_found("Contact")?;

                    let Some(same_as_id) = contact.same_as_id else {
                        return contacts.delete_contact(id).await;
                    };

                    let members = contacts.same_as_members(same_as_id).await?;
                    match plan_same_as_removal(id, &members) {
                        SameAsUpdate::Renumber(priorities) => {
                            for (member, priority) in priorities {
                                contacts.set_same_as(member, Some(same_as_id), priority).await?;
                            }
                            contacts.delete_contact(id).await
                        }
                        SameAsUpdate::Dissolve(remaining) => {
                            for member in remaining {
                                contacts.set_same_as(member, None, 0).await?;
                            }
                            contacts.delete_contact(id).await?;
                            contacts.delete_same_as(same_as_id).await
                        }
                    }
                })
            })
            .await
    }

    async fn suggested_same_as(
        &self,
        contact_id: Option<Uuid>,
        lastname: &str,
        firstname: &str,
        email: &str,
    ) -> AppResult<Vec<Contact>> {
        let contacts = self.uow.contacts();
        let mut candidates = Vec::new();

        if !lastname.is_empty() {
            candidates.extend(contacts.find_contacts_by_names(lastname, firstname).await?);
        }
        if !email.is_empty() {
            candidates.extend(contacts.find_contacts_by_any_email(email).await?);
        }

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|c| Some(c.id) != contact_id && seen.insert(c.id))
            .collect())
    }

    async fn save_entity(&self, entity: Entity) -> AppResult<Entity> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    save_entity_with_rules(ctx.entities(), ctx.contacts(), &entity).await
                })
            })
            .await
    }
}
