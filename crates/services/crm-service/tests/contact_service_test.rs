//! Contact service tests: same-as upkeep and entity saves.

mod support;

use std::sync::{Arc, Mutex};

use mockall::predicate::eq;
use tokio_test::assert_ok;
use uuid::Uuid;

use common::AppError;
use crm_service_lib::service::{ContactManager, ContactService};
use domain::{Contact, Entity};
use support::Mocks;

fn linked_contact(same_as_id: Uuid, priority: i32) -> Contact {
    Contact {
        same_as_id: Some(same_as_id),
        same_as_priority: priority,
        ..Contact::new(Uuid::new_v4())
    }
}

#[tokio::test]
async fn test_delete_contact_without_same_as() {
    let contact = Contact::new(Uuid::new_v4());
    let id = contact.id;

    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_get_contact()
        .with(eq(id))
        .returning(move |_| Ok(Some(contact.clone())));
    mocks
        .contacts
        .expect_delete_contact()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));

    let service = ContactManager::new(mocks.into_uow());
    assert_ok!(service.delete_contact(id).await);
}

#[tokio::test]
async fn test_deleting_one_of_two_dissolves_the_same_as() {
    let same_as_id = Uuid::new_v4();
    let removed = linked_contact(same_as_id, 1);
    let other = linked_contact(same_as_id, 2);
    let (removed_id, other_id) = (removed.id, other.id);

    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_get_contact()
        .returning(move |_| Ok(Some(removed.clone())));
    mocks
        .contacts
        .expect_same_as_members()
        .with(eq(same_as_id))
        .returning(move |_| Ok(vec![(removed_id, 1), (other_id, 2)]));
    mocks
        .contacts
        .expect_set_same_as()
        .with(eq(other_id), eq(None), eq(0))
        .times(1)
        .returning(|_, _, _| Ok(()));
    mocks
        .contacts
        .expect_delete_contact()
        .with(eq(removed_id))
        .times(1)
        .returning(|_| Ok(()));
    mocks
        .contacts
        .expect_delete_same_as()
        .with(eq(same_as_id))
        .times(1)
        .returning(|_| Ok(()));

    let service = ContactManager::new(mocks.into_uow());
    assert_ok!(service.delete_contact(removed_id).await);
}

#[tokio::test]
async fn test_deleting_one_of_three_renumbers_the_rest() {
    let same_as_id = Uuid::new_v4();
    let first = linked_contact(same_as_id, 1);
    let third = Uuid::new_v4();
    let second = Uuid::new_v4();
    let first_id = first.id;
    let renumbered: Arc<Mutex<Vec<(Uuid, i32)>>> = Arc::default();

    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_get_contact()
        .returning(move |_| Ok(Some(first.clone())));
    mocks
        .contacts
        .expect_same_as_members()
        .returning(move |_| Ok(vec![(first_id, 1), (third, 3), (second, 2)]));
    let calls = renumbered.clone();
    mocks
        .contacts
        .expect_set_same_as()
        .returning(move |contact_id, link, priority| {
            assert_eq!(link, Some(same_as_id));
            calls.lock().unwrap().push((contact_id, priority));
            Ok(())
        });
    mocks
        .contacts
        .expect_delete_contact()
        .times(1)
        .returning(|_| Ok(()));
    mocks.contacts.expect_delete_same_as().never();

    let service = ContactManager::new(mocks.into_uow());
    assert_ok!(service.delete_contact(first_id).await);

    assert_eq!(*renumbered.lock().unwrap(), vec![(second, 1), (third, 2)]);
}

#[tokio::test]
async fn test_delete_unknown_contact_fails() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_get_contact().returning(|_| Ok(None));
    mocks.contacts.expect_delete_contact().never();

    let service = ContactManager::new(mocks.into_uow());
    let result = service.delete_contact(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_suggested_same_as_merges_names_and_emails() {
    let current = Contact::new(Uuid::new_v4());
    let by_name = Contact::new(Uuid::new_v4());
    let by_both = Contact::new(Uuid::new_v4());
    let current_id = current.id;
    let expected = vec![by_name.id, by_both.id];

    let mut mocks = Mocks::default();
    let names = vec![current.clone(), by_name.clone(), by_both.clone()];
    mocks
        .contacts
        .expect_find_contacts_by_names()
        .returning(move |_, _| Ok(names.clone()));
    let emails = vec![by_both.clone(), current.clone()];
    mocks
        .contacts
        .expect_find_contacts_by_any_email()
        .returning(move |_| Ok(emails.clone()));

    let service = ContactManager::new(mocks.into_uow());
    let suggested = service
        .suggested_same_as(Some(current_id), "Dupond", "Pierre", "pierre@dupond.fr")
        .await
        .unwrap();

    let ids: Vec<Uuid> = suggested.iter().map(|c| c.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_suggested_same_as_needs_a_name_or_an_email() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_find_contacts_by_names().never();
    mocks.contacts.expect_find_contacts_by_any_email().never();

    let service = ContactManager::new(mocks.into_uow());
    let suggested = service
        .suggested_same_as(None, "", "Pierre", "")
        .await
        .unwrap();

    assert!(suggested.is_empty());
}

#[tokio::test]
async fn test_save_entity_creates_a_default_contact() {
    let entity = Entity {
        website: "www.sanza.fr".to_string(),
        ..Entity::new("Sanza")
    };
    let entity_id = entity.id;

    let mut mocks = Mocks::default();
    mocks
        .entities
        .expect_save_entity()
        .times(1)
        .returning(|entity: &Entity| {
            assert_eq!(entity.website, "http://www.sanza.fr");
            Ok(entity.clone())
        });
    mocks
        .contacts
        .expect_list_entity_contacts()
        .returning(|_| Ok(vec![]));
    mocks
        .contacts
        .expect_save_contact()
        .times(1)
        .returning(move |contact: &Contact| {
            assert_eq!(contact.entity_id, entity_id);
            assert!(contact.main_contact);
            Ok(contact.clone())
        });

    let service = ContactManager::new(mocks.into_uow());
    let saved = service.save_entity(entity).await.unwrap();

    assert_eq!(saved.id, entity_id);
}

#[tokio::test]
async fn test_save_entity_promotes_a_main_contact() {
    let entity = Entity::new("Sanza");
    let member = Contact {
        main_contact: false,
        lastname: "Dupond".to_string(),
        ..Contact::new(entity.id)
    };
    let member_id = member.id;

    let mut mocks = Mocks::default();
    mocks
        .entities
        .expect_save_entity()
        .returning(|entity: &Entity| Ok(entity.clone()));
    mocks
        .contacts
        .expect_list_entity_contacts()
        .returning(move |_| Ok(vec![member.clone()]));
    mocks
        .contacts
        .expect_save_contact()
        .times(1)
        .returning(move |contact: &Contact| {
            assert_eq!(contact.id, member_id);
            assert!(contact.main_contact);
            Ok(contact.clone())
        });

    let service = ContactManager::new(mocks.into_uow());
    assert_ok!(service.save_entity(entity).await);
}
