//! Row resolution shared by the import preview and the import confirmation.
//!
//! The preview only looks records up and flags what already exists. The
//! confirmation runs the same lookups through transaction-bound repositories
//! and creates whatever is missing.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::columns::ImportColumns;
use super::row::ImportRow;
use crate::infra::RepositorySet;
use crate::service::city_service::{resolve_optional_city, CityQuery, CityResolver};
use crate::service::contact_service::save_entity_with_rules;
use common::{AppResult, CrmSettings};
use domain::{Contact, ContactsImport, CustomFieldModel, Entity, Subscription};

/// A name from the file and whether a record already carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameFlag {
    pub name: String,
    pub exists: bool,
}

/// A parsed line with its duplicate flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub row: ImportRow,
    pub entity_exists: bool,
    pub contact_exists: bool,
    /// `None` when the line has no entity type
    pub entity_type_exists: Option<bool>,
    pub roles: Vec<NameFlag>,
    pub entity_groups: Vec<NameFlag>,
    pub contact_groups: Vec<NameFlag>,
    pub city_exists: bool,
    pub entity_city_exists: bool,
}

/// Names already met earlier in the same file.
#[derive(Debug, Default)]
struct Batch {
    entities: HashSet<String>,
    /// Lowercase
    roles: HashSet<String>,
    groups: HashSet<String>,
    /// Entities whose custom fields were already written
    entities_with_fields: HashSet<String>,
}

pub struct RowResolver<'r> {
    repos: RepositorySet<'r>,
    cities: CityResolver<'r>,
    import: &'r ContactsImport,
    columns: &'r ImportColumns,
    default_department: &'r str,
    batch: Batch,
}

impl<'r> RowResolver<'r> {
    pub fn new(
        repos: RepositorySet<'r>,
        settings: &'r CrmSettings,
        import: &'r ContactsImport,
        columns: &'r ImportColumns,
        default_department: &'r str,
    ) -> Self {
        Self {
            cities: CityResolver::new(repos.zones, settings),
            repos,
            import,
            columns,
            default_department,
            batch: Batch::default(),
        }
    }

    async fn flag_names(&mut self, names: &[String], roles: bool) -> AppResult<Vec<NameFlag>> {
        let mut flags = Vec::with_capacity(names.len());
        for name in names {
            let exists = if roles {
                let key = name.to_lowercase();
                let in_db = self.repos.contacts.find_role_by_name(name).await?.is_some();
                !self.batch.roles.insert(key) || in_db
            } else {
                let in_db = self.repos.groups.find_group_by_name(name).await?.is_some();
                !self.batch.groups.insert(name.clone()) || in_db
            };
            flags.push(NameFlag {
                name: name.clone(),
                exists,
            });
        }
        Ok(flags)
    }

    /// Flag what the line would reuse, without writing anything.
    pub async fn inspect(&mut self, row: ImportRow) -> AppResult<PreviewRow> {
        let city_exists = self
            .cities
            .exists(&row.address.city, &row.address.zip_code, &row.address.country)
            .await?;
        let entity_city_exists = self
            .cities
            .exists(&row.entity.city, &row.entity.zip_code, &row.entity.country)
            .await?;

        let entity_name = &row.entity.name;
        let entity_exists = if entity_name.is_empty() {
            false
        } else {
            let in_db = !self.repos.entities.find_entities_by_name(entity_name).await?.is_empty();
            !self.batch.entities.insert(entity_name.clone()) || in_db
        };

        let contact_exists = if entity_name.is_empty() {
            self.repos
                .contacts
                .find_single_contact(&row.firstname, &row.lastname)
                .await?
                .is_some()
        } else {
            let mut found = false;
            for entity in self.repos.entities.find_entities_by_name(entity_name).await? {
                if entity.name != *entity_name {
                    continue;
                }
                if self
                    .repos
                    .contacts
                    .find_contact(entity.id, &row.firstname, &row.lastname)
                    .await?
                    .is_some()
                {
                    found = true;
                    break;
                }
            }
            found
        };

        let entity_type_exists = if row.entity.entity_type.is_empty() {
            None
        } else {
            Some(
                self.repos
                    .entities
                    .find_entity_type_by_name(&row.entity.entity_type)
                    .await?
                    .is_some(),
            )
        };

        let roles = self.flag_names(&row.roles, true).await?;
        let entity_groups = self.flag_names(&row.entity_groups, false).await?;
        let contact_groups = self.flag_names(&row.contact_groups, false).await?;

        Ok(PreviewRow {
            row,
            entity_exists,
            contact_exists,
            entity_type_exists,
            roles,
            entity_groups,
            contact_groups,
            city_exists,
            entity_city_exists,
        })
    }

    async fn entity_type_id(&self, row: &ImportRow) -> AppResult<Option<Uuid>> {
        let name = row.entity.entity_type.trim();
        if name.is_empty() {
            return Ok(self.import.entity_type_id);
        }
        let entity_type = match self.repos.entities.find_entity_type_by_name(name).await? {
            Some(entity_type) => entity_type,
            None => self.repos.entities.create_entity_type(name.to_string()).await?,
        };
        Ok(Some(entity_type.id))
    }

    /// Existing entity by name, a new named one, or a single-contact placeholder.
    async fn resolve_entity(&self, row: &ImportRow) -> AppResult<Entity> {
        let entities = self.repos.entities;
        let name = &row.entity.name;

        if !name.is_empty() {
            if let Some(existing) = entities.find_entities_by_name(name).await?.into_iter().next() {
                return Ok(existing);
            }
            let mut entity = Entity::new(name.clone());
            entity.entity_type_id = self.entity_type_id(row).await?;
            entity.imported_by = Some(self.import.id);
            return entities.save_entity(&entity).await;
        }

        let existing = match self
            .repos
            .contacts
            .find_single_contact(&row.firstname, &row.lastname)
            .await?
        {
            Some(contact) => entities.get_entity(contact.entity_id).await?,
            None => None,
        };
        let mut entity = existing.unwrap_or_else(|| Entity::single_contact(""));
        entity.name = format!("{} {}", row.firstname, row.lastname);
        entity.imported_by = Some(self.import.id);
        entities.save_entity(&entity).await
    }

    fn assign_scalars(row: &ImportRow, contact: &mut Contact, entity: &mut Entity) {
        fn set(target: &mut String, value: &str) {
            if !value.is_empty() {
                *target = value.to_string();
            }
        }

        if let Some(gender) = row.gender {
            contact.gender = gender;
        }
        if row.birth_date.is_some() {
            contact.birth_date = row.birth_date;
        }
        set(&mut contact.title, &row.title);
        set(&mut contact.email, &row.email);
        set(&mut contact.phone, &row.phone);
        set(&mut contact.mobile, &row.mobile);
        set(&mut contact.job, &row.job);
        set(&mut contact.notes, &row.notes);
        set(&mut contact.favorite_language, &row.favorite_language);
        set(&mut contact.postal.address, &row.address.address);
        set(&mut contact.postal.address2, &row.address.address2);
        set(&mut contact.postal.address3, &row.address.address3);
        set(&mut contact.postal.cedex, &row.address.cedex);
        set(&mut contact.postal.zip_code, &row.address.zip_code);

        set(&mut entity.description, &row.entity.description);
        set(&mut entity.website, &row.entity.website);
        set(&mut entity.email, &row.entity.email);
        set(&mut entity.phone, &row.entity.phone);
        set(&mut entity.fax, &row.entity.fax);
        set(&mut entity.notes, &row.entity.notes);
        set(&mut entity.postal.address, &row.entity.address);
        set(&mut entity.postal.address2, &row.entity.address2);
        set(&mut entity.postal.address3, &row.entity.address3);
        set(&mut entity.postal.cedex, &row.entity.cedex);
        set(&mut entity.postal.zip_code, &row.entity.zip_code);
    }

    async fn city_id(&self, city: &str, zip_code: &str, country: &str) -> AppResult<Option<Uuid>> {
        let query = CityQuery {
            city_name: city.to_string(),
            zip_code: zip_code.to_string(),
            country: country.to_string(),
            default_department: self.default_department.to_string(),
        };
        resolve_optional_city(&self.cities, &query).await
    }

    async fn group_id(&self, name: &str) -> AppResult<Uuid> {
        let group = match self.repos.groups.find_group_by_name(name).await? {
            Some(group) => group,
            None => self.repos.groups.create_group(name).await?,
        };
        Ok(group.id)
    }

    /// Create or update the records of one line. Returns the saved contact.
    pub async fn apply(&mut self, row: &ImportRow) -> AppResult<Contact> {
        let contacts = self.repos.contacts;
        let mut entity = self.resolve_entity(row).await?;
        let is_first_for_entity = entity.is_single_contact
            || self.batch.entities_with_fields.insert(entity.name.clone());

        let mut contact = match contacts
            .find_contact(entity.id, &row.firstname, &row.lastname)
            .await?
        {
            Some(contact) => contact,
            None => Contact {
                firstname: row.firstname.clone(),
                lastname: row.lastname.clone(),
                ..Contact::new(entity.id)
            },
        };
        contact.imported_by = Some(self.import.id);

        Self::assign_scalars(row, &mut contact, &mut entity);
        if let Some(city_id) = self
            .city_id(&row.address.city, &row.address.zip_code, &row.address.country)
            .await?
        {
            contact.postal.city_id = Some(city_id);
        }
        if let Some(city_id) = self
            .city_id(&row.entity.city, &row.entity.zip_code, &row.entity.country)
            .await?
        {
            entity.postal.city_id = Some(city_id);
        }

        for name in &row.roles {
            let role = match contacts.find_role_by_name(name).await? {
                Some(role) => role,
                None => contacts.create_role(name.clone()).await?,
            };
            if !contact.role_ids.contains(&role.id) {
                contact.role_ids.push(role.id);
            }
        }

        let contact = contacts.save_contact(&contact).await?;
        let entity = save_entity_with_rules(self.repos.entities, contacts, &entity).await?;

        for group_id in &self.import.group_ids {
            self.repos.groups.add_contact(*group_id, contact.id).await?;
        }
        for name in &row.entity_groups {
            let group_id = self.group_id(name).await?;
            if entity.is_single_contact {
                self.repos.groups.add_contact(group_id, contact.id).await?;
            } else {
                self.repos.groups.add_entity(group_id, entity.id).await?;
            }
        }
        for name in &row.contact_groups {
            let group_id = self.group_id(name).await?;
            self.repos.groups.add_contact(group_id, contact.id).await?;
        }

        for other in contacts.list_entity_contacts(entity.id).await? {
            if other.id != contact.id && !other.has_name() {
                contacts.delete_contact(other.id).await?;
            }
        }

        self.write_custom_fields(row, &contact, &entity, is_first_for_entity)
            .await?;
        self.write_subscriptions(row, &contact).await?;
        Ok(contact)
    }

    async fn write_custom_fields(
        &self,
        row: &ImportRow,
        contact: &Contact,
        entity: &Entity,
        is_first_for_entity: bool,
    ) -> AppResult<()> {
        let fields = self.columns.custom_fields().map(|(_, field)| field);
        for (field, value) in fields.zip(&row.custom_values) {
            let Some(field) = field else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match field.model {
                CustomFieldModel::Entity if is_first_for_entity => {
                    self.repos
                        .custom_fields
                        .set_entity_value(field.id, entity.id, value.clone())
                        .await?
                }
                CustomFieldModel::Entity => {}
                CustomFieldModel::Contact => {
                    self.repos
                        .custom_fields
                        .set_contact_value(field.id, contact.id, value.clone())
                        .await?
                }
            }
        }
        Ok(())
    }

    /// New opt-ins for checked types the contact has no subscription to.
    async fn write_subscriptions(&self, row: &ImportRow, contact: &Contact) -> AppResult<()> {
        let checked: Vec<Uuid> = row
            .subscriptions
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(type_id, _)| *type_id)
            .collect();
        if checked.is_empty() {
            return Ok(());
        }

        let existing: HashSet<Uuid> = self
            .repos
            .subscriptions
            .find_for_contact(contact.id)
            .await?
            .into_iter()
            .map(|s| s.subscription_type_id)
            .collect();
        let now = Utc::now();
        for type_id in checked.into_iter().filter(|id| !existing.contains(id)) {
            self.repos
                .subscriptions
                .save(&Subscription::accepted(contact.id, type_id, now))
                .await?;
        }
        Ok(())
    }
}
