mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use heptapal_store::config::DatabaseConfig;
use heptapal_store::repositories::{ReminderChanges, ReminderRepository};
use heptapal_store::storage::ConnectionManager;
use heptapal_store::tools::ReminderTools;

fn at(day: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let manager = common::memory_manager().await;
    let session = manager.get_session().await.unwrap();
    let repo = ReminderRepository::new(&session);

    let added = repo.add("Dentist", "Annual check-up", at(20, 9, 30)).await;
    assert!(added.is_success());
    assert_eq!(added.message(), "Reminder 'Dentist' added successfully");
    let id = added.reminder().unwrap().id;

    let fetched = repo.get(id).await;
    assert_eq!(fetched.message(), format!("Reminder {} retrieved successfully", id));
    let reminder = fetched.reminder().unwrap();
    assert_eq!(reminder.title, "Dentist");
    assert_eq!(reminder.description, "Annual check-up");
    assert_eq!(reminder.remind_time, at(20, 9, 30));
    assert!(reminder.is_active);
}

#[tokio::test]
async fn test_envelope_json_shape() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let json = tools
        .add_reminder("Call Mom", "Weekly catch-up", "2024-12-18 19:00")
        .await
        .to_json();

    assert_eq!(json["status"], "success");
    assert_eq!(json["reminder"]["remind_time"], "2024-12-18 19:00:00");
    assert_eq!(json["reminder"]["is_active"], true);
    assert_eq!(json.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_requires_title_and_description() {
    let manager = common::memory_manager().await;
    let session = manager.get_session().await.unwrap();
    let repo = ReminderRepository::new(&session);

    let missing_title = repo.add("  ", "Something", at(1, 8, 0)).await;
    assert!(!missing_title.is_success());
    assert_eq!(missing_title.message(), "Title is required");

    let missing_description = repo.add("Something", "", at(1, 8, 0)).await;
    assert_eq!(missing_description.message(), "Description is required");

    assert_eq!(repo.list().await.reminders().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_remind_time_is_rejected() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let envelope = tools.add_reminder("Call Mom", "Weekly catch-up", "tomorrow evening").await;
    assert_eq!(envelope.status(), "error");
    assert!(envelope.payload().is_none());

    let listed = tools.list_reminders().await;
    assert_eq!(listed.message(), "Found 0 active reminders");
}

#[tokio::test]
async fn test_soft_delete_keeps_row() {
    // Add, delete, then list and get
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let added = tools
        .add_reminder("Call Mom", "Weekly catch-up", "2024-12-18 19:00")
        .await;
    let id = added.reminder().unwrap().id;

    let deleted = tools.delete_reminder(id).await;
    assert!(deleted.is_success());
    assert_eq!(deleted.message(), "Reminder 'Call Mom' deleted successfully");

    let listed = tools.list_reminders().await;
    assert!(listed.reminders().unwrap().iter().all(|r| r.id != id));

    let fetched = tools.get_reminder(id).await;
    assert!(fetched.is_success());
    assert!(!fetched.reminder().unwrap().is_active);
}

#[tokio::test]
async fn test_list_returns_active_in_insertion_order() {
    let manager = common::memory_manager().await;
    let session = manager.get_session().await.unwrap();
    let repo = ReminderRepository::new(&session);

    for title in ["First", "Second", "Third"] {
        repo.add(title, "body", at(2, 10, 0)).await;
    }
    let second = repo.list().await.reminders().unwrap()[1].id;
    repo.delete(second).await;

    let listed = repo.list().await;
    assert_eq!(listed.message(), "Found 2 active reminders");
    let titles: Vec<&str> = listed.reminders().unwrap().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Third"]);
}

#[tokio::test]
async fn test_missing_ids_report_not_found() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    for envelope in [
        tools.get_reminder(42).await,
        tools.update_reminder(42, Some("x"), None, None).await,
        tools.delete_reminder(42).await,
    ] {
        assert!(!envelope.is_success());
        assert_eq!(envelope.message(), "Reminder with ID 42 not found");
    }
}

#[tokio::test]
async fn test_case_insensitive_search() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    tools
        .add_reminder("Pick up Groceries", "Milk and eggs", "2024-12-18 17:00")
        .await;
    tools
        .add_reminder("Gym", "Leg day, then GROCERY run", "2024-12-19 07:00")
        .await;
    tools.add_reminder("Laundry", "Whites", "2024-12-19 09:00").await;

    let found = tools.search_reminders("grocer").await;
    assert_eq!(found.message(), "Found 2 matching reminders");
    let titles: Vec<&str> = found.reminders().unwrap().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Pick up Groceries", "Gym"]);
}

#[tokio::test]
async fn test_search_skips_deleted_and_matches_wildcards_literally() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let gone = tools
        .add_reminder("Pick up Groceries", "Milk", "2024-12-18 17:00")
        .await
        .reminder()
        .unwrap()
        .id;
    tools.delete_reminder(gone).await;
    tools.add_reminder("Budget", "Save 10% more", "2024-12-18 17:00").await;

    assert_eq!(tools.search_reminders("grocer").await.reminders().unwrap().len(), 0);
    assert_eq!(tools.search_reminders("10%").await.reminders().unwrap().len(), 1);
    assert_eq!(tools.search_reminders("%").await.reminders().unwrap().len(), 1);
    assert_eq!(tools.search_reminders("_").await.reminders().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_skips_empty_fields() {
    let manager = common::memory_manager().await;
    let session = manager.get_session().await.unwrap();
    let repo = ReminderRepository::new(&session);

    let id = repo
        .add("Standup", "Daily sync", at(3, 9, 0))
        .await
        .reminder()
        .unwrap()
        .id;

    // Empty strings cannot blank out a field.
    let updated = repo
        .update(
            id,
            ReminderChanges {
                title: Some(String::new()),
                description: Some("Daily sync, remote".to_string()),
                remind_time: None,
            },
        )
        .await;
    assert_eq!(updated.message(), format!("Reminder {} updated successfully", id));
    let reminder = updated.reminder().unwrap();
    assert_eq!(reminder.title, "Standup");
    assert_eq!(reminder.description, "Daily sync, remote");
    assert_eq!(reminder.remind_time, at(3, 9, 0));

    let untouched = repo.update(id, ReminderChanges::default()).await;
    assert!(untouched.is_success());
    assert_eq!(untouched.reminder().unwrap().description, "Daily sync, remote");
}

#[tokio::test]
async fn test_update_through_tools_parses_remind_time() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let id = tools
        .add_reminder("Standup", "Daily sync", "2024-12-03 09:00")
        .await
        .reminder()
        .unwrap()
        .id;

    let moved = tools
        .update_reminder(id, None, None, Some("2024-12-04T10:15"))
        .await;
    assert_eq!(moved.reminder().unwrap().remind_time, at(4, 10, 15));

    let bad = tools.update_reminder(id, None, None, Some("next week")).await;
    assert!(!bad.is_success());
    assert_eq!(
        tools.get_reminder(id).await.reminder().unwrap().remind_time,
        at(4, 10, 15)
    );
}

#[tokio::test]
async fn test_overlong_title_is_rejected() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    let title = "x".repeat(256);
    let envelope = tools.add_reminder(&title, "body", "2024-12-18 19:00").await;
    assert!(!envelope.is_success());
    assert_eq!(envelope.message(), "Title must be at most 255 characters");
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let manager = common::memory_manager().await;
    let tools = ReminderTools::new(manager);

    tools.add_reminder("ÉCOLE pickup", "Bring the bags", "2024-12-18 15:30").await;
    tools.add_reminder("Ecole meeting", "Unaccented", "2024-12-18 16:00").await;

    let found = tools.search_reminders("école").await;
    assert_eq!(found.message(), "Found 1 matching reminders");
    assert_eq!(found.reminders().unwrap()[0].title, "ÉCOLE pickup");

    let by_description = tools.search_reminders("BAGS").await;
    assert_eq!(by_description.reminders().unwrap().len(), 1);
}

#[tokio::test]
async fn test_engine_failure_reports_persistence_error() {
    // Connected, but the tables were never created.
    let manager = Arc::new(ConnectionManager::new(DatabaseConfig::sqlite_memory()).unwrap());
    assert!(manager.connect().await);
    let tools = ReminderTools::new(manager.clone());

    let added = tools.add_reminder("Call Mom", "Weekly catch-up", "2024-12-18 19:00").await;
    assert_eq!(added.status(), "error");
    assert!(added.message().starts_with("Failed to add reminder: "));
    assert!(added.message().contains("reminders"));
    assert!(added.payload().is_none());

    let listed = tools.list_reminders().await;
    assert!(listed.message().starts_with("Failed to list reminders: "));

    // The rolled-back session leaves the pool usable.
    assert!(manager.test_connection().await);
}
