//! Contact import tests against an in-memory CRM behind the mocks.

mod support;

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use common::AppError;
use crm_service_lib::service::import::ImportColumns;
use crm_service_lib::service::{ImportManager, ImportService};
use domain::{
    Contact, ContactsImport, CustomField, CustomFieldModel, Entity, EntityRole, EntityType,
    Gender, Group, Subscription, SubscriptionType,
};
use support::{settings, Mocks, TestUnitOfWork};

#[derive(Default)]
struct State {
    entities: Vec<Entity>,
    entity_types: Vec<EntityType>,
    contacts: Vec<Contact>,
    roles: Vec<EntityRole>,
    groups: Vec<Group>,
    subscriptions: Vec<Subscription>,
    entity_values: Vec<(Uuid, Uuid, String)>,
    contact_values: Vec<(Uuid, Uuid, String)>,
}

/// Records shared by every mocked repository.
#[derive(Clone)]
struct FakeCrm {
    state: Arc<Mutex<State>>,
    import: ContactsImport,
    subscription_types: Vec<SubscriptionType>,
    custom_fields: Vec<CustomField>,
}

impl FakeCrm {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            import: ContactsImport::new("test import"),
            subscription_types: vec![],
            custom_fields: vec![],
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn columns(&self) -> ImportColumns {
        ImportColumns::new(&self.subscription_types, self.custom_fields.clone()).unwrap()
    }

    /// A file with a header line and one line per row, cells placed by column name.
    fn file(&self, rows: &[&[(&str, &str)]]) -> Vec<u8> {
        let columns = self.columns();
        let mut lines = vec![columns.names().join(",")];
        for row in rows {
            let cells: Vec<&str> = columns
                .names()
                .iter()
                .map(|name| {
                    row.iter()
                        .find(|(column, _)| column == name)
                        .map(|(_, value)| *value)
                        .unwrap_or("")
                })
                .collect();
            lines.push(cells.join(","));
        }
        format!("{}\n", lines.join("\n")).into_bytes()
    }

    fn service(&self) -> ImportManager<TestUnitOfWork> {
        ImportManager::new(self.mocks().into_uow(), settings())
    }

    fn mocks(&self) -> Mocks {
        let mut mocks = Mocks::default();

        let import = self.import.clone();
        mocks
            .imports
            .expect_get_import()
            .returning(move |id| Ok((id == import.id).then(|| import.clone())));

        let types = self.subscription_types.clone();
        mocks
            .subscriptions
            .expect_list_types()
            .returning(move || Ok(types.clone()));
        let state = self.state.clone();
        mocks
            .subscriptions
            .expect_find_for_contact()
            .returning(move |contact_id| {
                let state = state.lock().unwrap();
                Ok(state
                    .subscriptions
                    .iter()
                    .filter(|s| s.contact_id == contact_id)
                    .cloned()
                    .collect())
            });
        let state = self.state.clone();
        mocks
            .subscriptions
            .expect_save()
            .returning(move |subscription: &Subscription| {
                let mut state = state.lock().unwrap();
                state.subscriptions.retain(|s| s.id != subscription.id);
                state.subscriptions.push(subscription.clone());
                Ok(subscription.clone())
            });

        let fields = self.custom_fields.clone();
        mocks
            .custom_fields
            .expect_list_by_import_order()
            .returning(move || Ok(fields.clone()));
        let state = self.state.clone();
        mocks
            .custom_fields
            .expect_set_entity_value()
            .returning(move |field_id, entity_id, value| {
                state.lock().unwrap().entity_values.push((field_id, entity_id, value));
                Ok(())
            });
        let state = self.state.clone();
        mocks
            .custom_fields
            .expect_set_contact_value()
            .returning(move |field_id, contact_id, value| {
                state.lock().unwrap().contact_values.push((field_id, contact_id, value));
                Ok(())
            });

        self.wire_entities(&mut mocks);
        self.wire_contacts(&mut mocks);
        self.wire_groups(&mut mocks);
        mocks
    }

    fn wire_entities(&self, mocks: &mut Mocks) {
        let state = self.state.clone();
        mocks
            .entities
            .expect_find_entities_by_name()
            .returning(move |name: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .entities
                    .iter()
                    .filter(|e| e.name.to_lowercase() == name.to_lowercase())
                    .cloned()
                    .collect())
            });
        let state = self.state.clone();
        mocks
            .entities
            .expect_get_entity()
            .returning(move |id| Ok(state.lock().unwrap().entities.iter().find(|e| e.id == id).cloned()));
        let state = self.state.clone();
        mocks
            .entities
            .expect_save_entity()
            .returning(move |entity: &Entity| {
                let mut state = state.lock().unwrap();
                match state.entities.iter_mut().find(|e| e.id == entity.id) {
                    Some(existing) => *existing = entity.clone(),
                    None => state.entities.push(entity.clone()),
                }
                Ok(entity.clone())
            });
        let state = self.state.clone();
        mocks
            .entities
            .expect_find_entity_type_by_name()
            .returning(move |name: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .entity_types
                    .iter()
                    .find(|t| t.name.to_lowercase() == name.to_lowercase())
                    .cloned())
            });
        let state = self.state.clone();
        mocks
            .entities
            .expect_create_entity_type()
            .returning(move |name| {
                let entity_type = EntityType {
                    id: Uuid::new_v4(),
                    name,
                };
                state.lock().unwrap().entity_types.push(entity_type.clone());
                Ok(entity_type)
            });
    }

    fn wire_contacts(&self, mocks: &mut Mocks) {
        let state = self.state.clone();
        mocks
            .contacts
            .expect_find_contact()
            .returning(move |entity_id, firstname: &str, lastname: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .contacts
                    .iter()
                    .find(|c| c.entity_id == entity_id && c.firstname == firstname && c.lastname == lastname)
                    .cloned())
            });
        let state = self.state.clone();
        mocks
            .contacts
            .expect_find_single_contact()
            .returning(move |firstname: &str, lastname: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .contacts
                    .iter()
                    .filter(|c| c.firstname == firstname && c.lastname == lastname)
                    .find(|c| {
                        state
                            .entities
                            .iter()
                            .any(|e| e.id == c.entity_id && e.is_single_contact)
                    })
                    .cloned())
            });
        let state = self.state.clone();
        mocks
            .contacts
            .expect_list_entity_contacts()
            .returning(move |entity_id| {
                let state = state.lock().unwrap();
                Ok(state
                    .contacts
                    .iter()
                    .filter(|c| c.entity_id == entity_id)
                    .cloned()
                    .collect())
            });
        let state = self.state.clone();
        mocks
            .contacts
            .expect_save_contact()
            .returning(move |contact: &Contact| {
                let mut state = state.lock().unwrap();
                match state.contacts.iter_mut().find(|c| c.id == contact.id) {
                    Some(existing) => *existing = contact.clone(),
                    None => state.contacts.push(contact.clone()),
                }
                Ok(contact.clone())
            });
        let state = self.state.clone();
        mocks.contacts.expect_delete_contact().returning(move |id| {
            state.lock().unwrap().contacts.retain(|c| c.id != id);
            Ok(())
        });
        let state = self.state.clone();
        mocks
            .contacts
            .expect_find_role_by_name()
            .returning(move |name: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .roles
                    .iter()
                    .find(|r| r.name.to_lowercase() == name.to_lowercase())
                    .cloned())
            });
        let state = self.state.clone();
        mocks.contacts.expect_create_role().returning(move |name| {
            let role = EntityRole {
                id: Uuid::new_v4(),
                name,
            };
            state.lock().unwrap().roles.push(role.clone());
            Ok(role)
        });
        let state = self.state.clone();
        mocks
            .contacts
            .expect_find_contacts_by_email()
            .returning(move |email: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .contacts
                    .iter()
                    .filter(|c| c.email == email)
                    .cloned()
                    .collect())
            });
    }

    fn wire_groups(&self, mocks: &mut Mocks) {
        let state = self.state.clone();
        mocks
            .groups
            .expect_find_group_by_name()
            .returning(move |name: &str| {
                let state = state.lock().unwrap();
                Ok(state
                    .groups
                    .iter()
                    .find(|g| g.name.to_lowercase() == name.trim().to_lowercase())
                    .cloned())
            });
        let state = self.state.clone();
        mocks
            .groups
            .expect_create_group()
            .returning(move |name: &str| {
                let group = Group::new(name);
                state.lock().unwrap().groups.push(group.clone());
                Ok(group)
            });
        let state = self.state.clone();
        mocks
            .groups
            .expect_add_entity()
            .returning(move |group_id, entity_id| {
                let mut state = state.lock().unwrap();
                if let Some(group) = state.groups.iter_mut().find(|g| g.id == group_id) {
                    if !group.has_entity(entity_id) {
                        group.entity_ids.push(entity_id);
                    }
                }
                Ok(())
            });
        let state = self.state.clone();
        mocks
            .groups
            .expect_add_contact()
            .returning(move |group_id, contact_id| {
                let mut state = state.lock().unwrap();
                if let Some(group) = state.groups.iter_mut().find(|g| g.id == group_id) {
                    if !group.has_contact(contact_id) {
                        group.contact_ids.push(contact_id);
                    }
                }
                Ok(())
            });
    }

    fn group(&self, name: &str) -> Option<Group> {
        self.state().groups.iter().find(|g| g.name == name).cloned()
    }
}

fn custom_field(name: &str, model: CustomFieldModel, import_order: i32) -> CustomField {
    CustomField {
        id: Uuid::new_v4(),
        model,
        name: name.to_string(),
        label: name.to_string(),
        widget: String::new(),
        ordering: 0,
        import_order,
        export_order: 0,
        is_link: false,
    }
}

#[tokio::test]
async fn test_template_lists_subscriptions_and_custom_fields() {
    let mut crm = FakeCrm::new();
    crm.subscription_types = vec![SubscriptionType {
        id: Uuid::new_v4(),
        name: "Newsletter".to_string(),
        order_index: 1,
    }];
    crm.custom_fields = vec![custom_field("siret", CustomFieldModel::Entity, 1)];

    let template = crm.service().template().await.unwrap();

    assert!(template.contains("\"role\";\"accept_newsletter\";\"entity\""));
    assert!(template.ends_with("\"birth_date\";\"siret\"\n"));
}

#[tokio::test]
async fn test_confirm_creates_entity_contact_and_links() {
    let crm = FakeCrm::new();
    let bytes = crm.file(&[&[
        ("gender", "Mr"),
        ("firstname", "Pierre"),
        ("lastname", "Dupont"),
        ("email", "pierre@acme.fr"),
        ("role", "Boss; Owner"),
        ("entity", "Acme"),
        ("entity.type", "Company"),
        ("entity.website", "acme.fr"),
        ("entity.groups", "Partners"),
        ("groups", "Friends"),
        ("birth_date", "12/03/1980"),
    ]]);

    let count = crm
        .service()
        .confirm(crm.import.id, bytes, String::new())
        .await
        .unwrap();

    assert_eq!(count, 1);
    let state = crm.state();
    assert_eq!(state.entities.len(), 1);
    let entity = &state.entities[0];
    assert_eq!(entity.name, "Acme");
    assert_eq!(entity.website, "http://acme.fr");
    assert_eq!(entity.imported_by, Some(crm.import.id));
    assert_eq!(entity.entity_type_id, Some(state.entity_types[0].id));

    assert_eq!(state.contacts.len(), 1);
    let contact = &state.contacts[0];
    assert_eq!(contact.entity_id, entity.id);
    assert_eq!(contact.gender, Gender::Male);
    assert_eq!(contact.email, "pierre@acme.fr");
    assert_eq!(contact.role_ids.len(), 2);
    assert_eq!(contact.imported_by, Some(crm.import.id));
    assert!(contact.birth_date.is_some());

    let (entity_id, contact_id) = (entity.id, contact.id);
    drop(state);
    assert!(crm.group("Partners").unwrap().has_entity(entity_id));
    assert!(crm.group("Friends").unwrap().has_contact(contact_id));
}

#[tokio::test]
async fn test_confirming_twice_reuses_records() {
    let crm = FakeCrm::new();
    let bytes = crm.file(&[&[
        ("firstname", "Pierre"),
        ("lastname", "Dupont"),
        ("role", "Boss"),
        ("entity", "Acme"),
    ]]);
    let second = crm.file(&[&[
        ("firstname", "Pierre"),
        ("lastname", "Dupont"),
        ("role", "BOSS"),
        ("entity", "ACME"),
    ]]);

    let service = crm.service();
    service.confirm(crm.import.id, bytes, String::new()).await.unwrap();
    service.confirm(crm.import.id, second, String::new()).await.unwrap();

    let state = crm.state();
    assert_eq!(state.entities.len(), 1);
    assert_eq!(state.contacts.len(), 1);
    assert_eq!(state.roles.len(), 1);
    assert_eq!(state.contacts[0].role_ids.len(), 1);
}

#[tokio::test]
async fn test_blank_cells_keep_stored_values() {
    let crm = FakeCrm::new();
    let first = crm.file(&[&[
        ("firstname", "Pierre"),
        ("lastname", "Dupont"),
        ("email", "pierre@acme.fr"),
        ("phone", "0102030405"),
        ("entity", "Acme"),
        ("birth_date", "12/03/1980"),
    ]]);
    let blank = crm.file(&[&[
        ("firstname", "Pierre"),
        ("lastname", "Dupont"),
        ("entity", "Acme"),
    ]]);

    let service = crm.service();
    service.confirm(crm.import.id, first, String::new()).await.unwrap();
    service.confirm(crm.import.id, blank, String::new()).await.unwrap();

    let state = crm.state();
    assert_eq!(state.contacts.len(), 1);
    let contact = &state.contacts[0];
    assert_eq!(
        contact.birth_date,
        chrono::NaiveDate::from_ymd_opt(1980, 3, 12)
    );
    assert_eq!(contact.email, "pierre@acme.fr");
    assert_eq!(contact.phone, "0102030405");
}

#[tokio::test]
async fn test_blank_entity_gives_single_contact_entity() {
    let crm = FakeCrm::new();
    let bytes = crm.file(&[&[
        ("firstname", "Marie"),
        ("lastname", "Curie"),
        ("entity.groups", "VIP"),
    ]]);

    crm.service()
        .confirm(crm.import.id, bytes, String::new())
        .await
        .unwrap();

    let state = crm.state();
    assert_eq!(state.entities.len(), 1);
    assert!(state.entities[0].is_single_contact);
    assert_eq!(state.entities[0].name, "curie marie");
    let contact_id = state.contacts[0].id;
    drop(state);

    let vip = crm.group("VIP").unwrap();
    assert!(vip.has_contact(contact_id));
    assert!(vip.entity_ids.is_empty());
}

#[tokio::test]
async fn test_entity_from_consumer_email() {
    let crm = FakeCrm::new();
    let bytes = crm.file(&[&[("email", "john@gmail.com")]]);

    crm.service()
        .confirm(crm.import.id, bytes, String::new())
        .await
        .unwrap();

    let state = crm.state();
    assert_eq!(state.entities[0].name, "john");
    assert_eq!(state.contacts[0].lastname, "John");
}

#[tokio::test]
async fn test_blank_contacts_of_the_entity_are_removed() {
    let crm = FakeCrm::new();
    let acme = Entity::new("Acme");
    let placeholder = Contact::new(acme.id);
    crm.state().entities.push(acme.clone());
    crm.state().contacts.push(placeholder.clone());

    let bytes = crm.file(&[&[("lastname", "Dupont"), ("entity", "acme")]]);
    crm.service()
        .confirm(crm.import.id, bytes, String::new())
        .await
        .unwrap();

    let state = crm.state();
    assert_eq!(state.contacts.len(), 1);
    assert_eq!(state.contacts[0].lastname, "Dupont");
    assert_eq!(state.contacts[0].entity_id, acme.id);
}

#[tokio::test]
async fn test_entity_custom_fields_are_written_once_per_entity() {
    let mut crm = FakeCrm::new();
    let badge = custom_field("badge", CustomFieldModel::Contact, 1);
    let siret = custom_field("siret", CustomFieldModel::Entity, 2);
    crm.custom_fields = vec![badge.clone(), siret.clone()];
    let bytes = crm.file(&[
        &[("lastname", "Dupont"), ("entity", "Acme"), ("cf_1", "A1"), ("cf_2", "111")],
        &[("lastname", "Durand"), ("entity", "Acme"), ("cf_1", "A2"), ("cf_2", "222")],
        &[("lastname", "Martin"), ("entity", "Acme"), ("cf_1", "")],
    ]);

    crm.service()
        .confirm(crm.import.id, bytes, String::new())
        .await
        .unwrap();

    let state = crm.state();
    let entity_values: Vec<&str> = state.entity_values.iter().map(|(_, _, v)| v.as_str()).collect();
    let contact_values: Vec<&str> = state.contact_values.iter().map(|(_, _, v)| v.as_str()).collect();
    assert_eq!(entity_values, vec!["111"]);
    assert_eq!(contact_values, vec!["A1", "A2"]);
    assert!(state.entity_values.iter().all(|(id, _, _)| *id == siret.id));
    assert!(state.contact_values.iter().all(|(id, _, _)| *id == badge.id));
}

#[tokio::test]
async fn test_checked_subscriptions_are_created_once() {
    let mut crm = FakeCrm::new();
    let newsletter = SubscriptionType {
        id: Uuid::new_v4(),
        name: "Newsletter".to_string(),
        order_index: 1,
    };
    crm.subscription_types = vec![newsletter.clone()];
    let bytes = crm.file(&[&[
        ("lastname", "Dupont"),
        ("entity", "Acme"),
        ("accept_newsletter", "x"),
    ]]);

    let service = crm.service();
    service
        .confirm(crm.import.id, bytes.clone(), String::new())
        .await
        .unwrap();
    service.confirm(crm.import.id, bytes, String::new()).await.unwrap();

    let state = crm.state();
    assert_eq!(state.subscriptions.len(), 1);
    assert_eq!(state.subscriptions[0].subscription_type_id, newsletter.id);
    assert!(state.subscriptions[0].accept_subscription);
}

#[tokio::test]
async fn test_preview_flags_existing_records() {
    let crm = FakeCrm::new();
    let acme = Entity::new("Acme");
    let mut dupont = Contact::new(acme.id);
    dupont.firstname = "Pierre".to_string();
    dupont.lastname = "Dupont".to_string();
    crm.state().entities.push(acme);
    crm.state().contacts.push(dupont);
    crm.state().roles.push(EntityRole {
        id: Uuid::new_v4(),
        name: "Boss".to_string(),
    });

    let bytes = crm.file(&[
        &[("firstname", "Pierre"), ("lastname", "Dupont"), ("entity", "ACME"), ("role", "boss")],
        &[("lastname", "Durand"), ("entity", "NewCo"), ("role", "Intern"), ("groups", "Friends")],
        &[("lastname", "Martin"), ("entity", "NewCo"), ("role", "intern"), ("groups", "Friends")],
    ]);

    let preview = crm
        .service()
        .preview(crm.import.id, bytes)
        .await
        .unwrap();

    assert_eq!(preview.total_rows, 4);
    let rows = &preview.rows;
    assert_eq!(rows.len(), 3);
    assert!(rows[0].entity_exists);
    assert!(!rows[0].contact_exists);
    assert!(rows[0].roles[0].exists);
    assert!(!rows[1].entity_exists);
    assert!(!rows[1].roles[0].exists);
    assert!(!rows[1].contact_groups[0].exists);
    assert!(rows[2].entity_exists);
    assert!(rows[2].roles[0].exists);
    assert!(rows[2].contact_groups[0].exists);
    assert_eq!(rows[1].entity_type_exists, None);

    let state = crm.state();
    assert_eq!(state.entities.len(), 1);
    assert_eq!(state.contacts.len(), 1);
    assert!(state.groups.is_empty());
}

#[tokio::test]
async fn test_preview_finds_contact_of_exact_entity_name() {
    let crm = FakeCrm::new();
    let acme = Entity::new("Acme");
    let mut dupont = Contact::new(acme.id);
    dupont.firstname = "Pierre".to_string();
    dupont.lastname = "Dupont".to_string();
    crm.state().entities.push(acme);
    crm.state().contacts.push(dupont);

    let bytes = crm.file(&[&[("firstname", "Pierre"), ("lastname", "Dupont"), ("entity", "Acme")]]);
    let preview = crm.service().preview(crm.import.id, bytes).await.unwrap();

    assert!(preview.rows[0].contact_exists);
}

#[tokio::test]
async fn test_bad_encoding_aborts_before_any_row() {
    let crm = FakeCrm::new();
    let mut bytes = crm.file(&[&[("lastname", "Dupont"), ("entity", "Acme")]]);
    bytes.extend_from_slice(b"\xff\xfe,Bad\n");

    let result = crm
        .service()
        .confirm(crm.import.id, bytes, String::new())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(msg)) if msg == "check that the file encoding is correct"
    ));
    assert!(crm.state().entities.is_empty());
}

#[tokio::test]
async fn test_invalid_separator_is_rejected() {
    let mut crm = FakeCrm::new();
    crm.import.separator = ";;".to_string();

    let result = crm.service().preview(crm.import.id, b"a;;b\n".to_vec()).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(msg)) if msg == "Invalid separator ;;"
    ));
}

#[tokio::test]
async fn test_unknown_import_is_not_found() {
    let crm = FakeCrm::new();
    let result = crm.service().preview(Uuid::new_v4(), vec![]).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unsubscribe_counts_contacts_with_subscriptions() {
    let crm = FakeCrm::new();
    let entity_id = Uuid::new_v4();
    let subscribed = Contact {
        email: "a@acme.fr".to_string(),
        ..Contact::new(entity_id)
    };
    let twin = Contact {
        email: "a@acme.fr".to_string(),
        ..Contact::new(entity_id)
    };
    let unsubscribed = Contact {
        email: "b@acme.fr".to_string(),
        ..Contact::new(entity_id)
    };
    let now = chrono::Utc::now();
    {
        let mut state = crm.state();
        state.subscriptions.push(Subscription::accepted(subscribed.id, Uuid::new_v4(), now));
        state.subscriptions.push(Subscription::accepted(subscribed.id, Uuid::new_v4(), now));
        state.subscriptions.push(Subscription::accepted(twin.id, Uuid::new_v4(), now));
        state.contacts.extend([subscribed, twin, unsubscribed]);
    }

    let count = crm
        .service()
        .unsubscribe(b"a@acme.fr;x\nb@acme.fr\nnobody@acme.fr\n".to_vec())
        .await
        .unwrap();

    assert_eq!(count, 2);
    let state = crm.state();
    assert!(state
        .subscriptions
        .iter()
        .all(|s| !s.accept_subscription && s.unsubscription_date.is_some()));
}
