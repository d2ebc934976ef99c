//! Action service tests.

mod support;

use chrono::{Timelike, Utc};
use mockall::predicate::eq;
use uuid::Uuid;

use common::AppError;
use crm_service_lib::service::{ActionManager, ActionService};
use domain::{Action, ActionStatus, ActionType};
use support::Mocks;

fn status(is_final: bool) -> ActionStatus {
    ActionStatus {
        id: Uuid::new_v4(),
        name: if is_final { "Done" } else { "Pending" }.to_string(),
        is_final,
    }
}

fn action_type(number_auto_generated: bool, last_number: i32) -> ActionType {
    ActionType {
        id: Uuid::new_v4(),
        name: "Meeting".to_string(),
        allowed_status_ids: vec![],
        number_auto_generated,
        last_number,
    }
}

/// Mocks answering the status and type lookups of a save.
fn mocks_for(status: Option<ActionStatus>, action_type: Option<ActionType>, has_final: bool) -> Mocks {
    let mut mocks = Mocks::default();
    mocks
        .actions
        .expect_get_status()
        .returning(move |_| Ok(status.clone()));
    mocks
        .actions
        .expect_get_type()
        .returning(move |_| Ok(action_type.clone()));
    mocks
        .actions
        .expect_type_has_final_status()
        .returning(move |_| Ok(has_final));
    mocks
        .actions
        .expect_save_action()
        .returning(|action: &Action| Ok(action.clone()));
    mocks
}

#[tokio::test]
async fn test_final_status_closes_the_action() {
    let done = status(true);
    let mut action = Action::new("Call back");
    action.status_id = Some(done.id);

    let service = ActionManager::new(mocks_for(Some(done), None, false).into_uow());
    let saved = service.create_action(action).await.unwrap();

    assert!(saved.done);
    let done_date = saved.done_date.unwrap();
    assert_eq!(done_date.second(), 0);
    assert_eq!(done_date.nanosecond(), 0);
}

#[tokio::test]
async fn test_non_final_status_reopens_when_type_has_a_final_status() {
    let pending = status(false);
    let meeting = action_type(false, 0);
    let mut action = Action::new("Meeting");
    action.status_id = Some(pending.id);
    action.type_id = Some(meeting.id);
    action.done = true;
    action.done_date = Some(Utc::now());

    let service = ActionManager::new(mocks_for(Some(pending), Some(meeting), true).into_uow());
    let saved = service.create_action(action).await.unwrap();

    assert!(!saved.done);
    assert_eq!(saved.done_date, None);
}

#[tokio::test]
async fn test_manual_done_is_kept_without_final_statuses() {
    let mut action = Action::new("Visit");
    action.done = true;

    let service = ActionManager::new(mocks_for(None, None, false).into_uow());
    let saved = service.create_action(action).await.unwrap();

    assert!(saved.done);
    assert!(saved.done_date.is_some());

    let mut reopened = saved.clone();
    reopened.done = false;
    let saved = service.create_action(reopened).await.unwrap();
    assert_eq!(saved.done_date, None);
}

#[tokio::test]
async fn test_auto_numbered_type_assigns_next_number() {
    let numbered = action_type(true, 4);
    let type_id = numbered.id;
    let mut action = Action::new("Invoice");
    action.type_id = Some(type_id);

    let mut mocks = mocks_for(None, Some(numbered), false);
    mocks
        .actions
        .expect_save_action_type()
        .times(1)
        .returning(|action_type: &ActionType| {
            assert_eq!(action_type.last_number, 5);
            Ok(action_type.clone())
        });

    let service = ActionManager::new(mocks.into_uow());
    let saved = service.create_action(action).await.unwrap();

    assert_eq!(saved.number, 5);
    assert_eq!(saved.type_id, Some(type_id));
}

#[tokio::test]
async fn test_numbered_action_keeps_its_number() {
    let numbered = action_type(true, 4);
    let mut action = Action::new("Invoice");
    action.type_id = Some(numbered.id);
    action.number = 2;

    let mut mocks = mocks_for(None, Some(numbered), false);
    mocks.actions.expect_save_action_type().never();

    let service = ActionManager::new(mocks.into_uow());
    let saved = service.create_action(action).await.unwrap();

    assert_eq!(saved.number, 2);
}

#[tokio::test]
async fn test_update_keeps_identity_and_creation_date() {
    let existing = Action::new("Old subject");
    let stored = existing.clone();

    let mut mocks = mocks_for(None, None, false);
    mocks
        .actions
        .expect_get_action()
        .with(eq(existing.id))
        .returning(move |_| Ok(Some(stored.clone())));

    let service = ActionManager::new(mocks.into_uow());
    let saved = service
        .update_action(existing.id, Action::new("New subject"))
        .await
        .unwrap();

    assert_eq!(saved.id, existing.id);
    assert_eq!(saved.created, existing.created);
    assert_eq!(saved.subject, "New subject");
}

#[tokio::test]
async fn test_update_unknown_action_fails() {
    let mut mocks = Mocks::default();
    mocks.actions.expect_get_action().returning(|_| Ok(None));
    mocks.actions.expect_save_action().never();

    let service = ActionManager::new(mocks.into_uow());
    let result = service
        .update_action(Uuid::new_v4(), Action::new("Ghost"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_status_fails() {
    let mut action = Action::new("Call");
    action.status_id = Some(Uuid::new_v4());

    let service = ActionManager::new(mocks_for(None, None, false).into_uow());
    let result = service.create_action(action).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
