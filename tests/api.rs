mod helpers;

use agenda_domain::{OwningItem, Reminder};
use agenda_sdk::{
    APIErrorVariant, AgendaSDK, CreateEventInput, CreateTaskInput, CreateUserInput, SentStatus,
    TaskStatus, UpdateEventInput, ID,
};
use chrono::{Duration, Utc};
use helpers::setup::spawn_app;

async fn create_user(sdk: &AgendaSDK, username: &str, email: Option<&str>) -> ID {
    sdk.user
        .create(CreateUserInput {
            username: username.into(),
            email: email.map(String::from),
        })
        .await
        .expect("Expected to create user")
        .user
        .id
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_rejects_invalid_api_key() {
    let (_, _, address) = spawn_app().await;
    let sdk = AgendaSDK::new(address, "not-the-key");
    let err = sdk
        .user
        .create(CreateUserInput {
            username: "ann".into(),
            email: None,
        })
        .await
        .expect_err("Expected the api key to be rejected");
    assert_eq!(err.variant, APIErrorVariant::Unauthorized);
}

#[actix_web::main]
#[test]
async fn test_crud_user() {
    let (_, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", Some("ann@example.com")).await;

    let user = sdk.user.get(user_id.clone()).await.unwrap().user;
    assert_eq!(user.username, "ann");
    assert_eq!(user.email, Some("ann@example.com".into()));

    let err = sdk
        .user
        .create(CreateUserInput {
            username: "ann".into(),
            email: None,
        })
        .await
        .expect_err("Expected username to be taken");
    assert_eq!(err.variant, APIErrorVariant::Conflict);

    assert!(sdk.user.delete(user_id.clone()).await.is_ok());
    let err = sdk.user.get(user_id).await.expect_err("User was deleted");
    assert_eq!(err.variant, APIErrorVariant::NotFound);
}

#[actix_web::main]
#[test]
async fn test_event_gets_a_reminder_before_it_starts() {
    let (_, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", Some("ann@example.com")).await;

    let start_time = Utc::now() + Duration::hours(3);
    let event = sdk
        .event
        .create(CreateEventInput {
            user_id: user_id.clone(),
            title: "Dentist".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
        })
        .await
        .expect("Expected to create event")
        .event;

    let reminders = sdk
        .event
        .get_reminders(user_id.clone(), event.id.clone())
        .await
        .unwrap()
        .reminders;
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].reminder_time, start_time - Duration::hours(1));
    assert_eq!(reminders[0].sent_status, SentStatus::Pending);

    // Moving the event close to now leaves no room for a reminder
    let start_time = Utc::now() + Duration::minutes(30);
    sdk.event
        .update(UpdateEventInput {
            user_id: user_id.clone(),
            event_id: event.id.clone(),
            title: "Dentist".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
        })
        .await
        .expect("Expected to update event");
    let reminders = sdk
        .event
        .get_reminders(user_id, event.id)
        .await
        .unwrap()
        .reminders;
    assert!(reminders.is_empty());
}

#[actix_web::main]
#[test]
async fn test_rejects_event_ending_before_it_starts() {
    let (_, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", None).await;

    let start_time = Utc::now() + Duration::hours(3);
    let err = sdk
        .event
        .create(CreateEventInput {
            user_id,
            title: "Dentist".into(),
            description: None,
            start_time,
            end_time: start_time - Duration::hours(1),
        })
        .await
        .expect_err("Expected invalid event to be rejected");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);
}

#[actix_web::main]
#[test]
async fn test_toggling_a_task_keeps_its_reminder() {
    let (_, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", Some("ann@example.com")).await;

    let due_date = (Utc::now() + Duration::days(2)).date_naive();
    let task = sdk
        .task
        .create(CreateTaskInput {
            user_id: user_id.clone(),
            description: "Renew passport".into(),
            due_date: Some(due_date),
            priority: None,
        })
        .await
        .expect("Expected to create task")
        .task;

    let reminders = sdk
        .task
        .get_reminders(user_id.clone(), task.id.clone())
        .await
        .unwrap()
        .reminders;
    assert_eq!(reminders.len(), 1);
    assert_eq!(
        reminders[0].reminder_time,
        due_date.and_hms_opt(9, 0, 0).unwrap().and_utc()
    );

    let toggled = sdk
        .task
        .toggle(user_id.clone(), task.id.clone())
        .await
        .unwrap()
        .task;
    assert_eq!(toggled.status, TaskStatus::Completed);

    let after_toggle = sdk
        .task
        .get_reminders(user_id, task.id)
        .await
        .unwrap()
        .reminders;
    assert_eq!(after_toggle.len(), 1);
    assert_eq!(after_toggle[0].id, reminders[0].id);
}

#[actix_web::main]
#[test]
async fn test_dispatch_delivers_due_reminders_once() {
    let (app, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", Some("ann@example.com")).await;

    let start_time = Utc::now() + Duration::hours(3);
    let event = sdk
        .event
        .create(CreateEventInput {
            user_id: user_id.clone(),
            title: "Dentist".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
        })
        .await
        .unwrap()
        .event;

    // The derived reminder is not due yet
    let report = sdk.reminder.dispatch().await.unwrap();
    assert_eq!(report.attempted, 0);

    let past = Utc::now() - Duration::minutes(5);
    let due = Reminder::new(user_id.clone(), OwningItem::Event(event.id.clone()), past, past);
    app.ctx.repos.reminders.insert(&due).await.unwrap();

    let report = sdk.reminder.dispatch().await.unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.sent, 1);
    assert_eq!(report.error, 0);

    let sent = app.mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "ann@example.com");
    assert_eq!(sent[0].subject, "Event Reminder: Dentist");

    let report = sdk.reminder.dispatch().await.unwrap();
    assert_eq!(report.attempted, 0);
    assert_eq!(app.mail.sent().len(), 1);

    let reminders = sdk
        .event
        .get_reminders(user_id, event.id)
        .await
        .unwrap()
        .reminders;
    let statuses = reminders
        .iter()
        .map(|r| r.sent_status)
        .collect::<Vec<_>>();
    assert!(statuses.contains(&SentStatus::Sent));
    assert!(statuses.contains(&SentStatus::Pending));
}

#[actix_web::main]
#[test]
async fn test_dispatch_marks_reminders_of_deleted_events_as_errors() {
    let (app, sdk, _) = spawn_app().await;
    let user_id = create_user(&sdk, "ann", Some("ann@example.com")).await;

    let start_time = Utc::now() + Duration::hours(3);
    let event = sdk
        .event
        .create(CreateEventInput {
            user_id: user_id.clone(),
            title: "Dentist".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
        })
        .await
        .unwrap()
        .event;

    let past = Utc::now() - Duration::minutes(5);
    let due = Reminder::new(user_id.clone(), OwningItem::Event(event.id.clone()), past, past);
    app.ctx.repos.reminders.insert(&due).await.unwrap();
    sdk.event.delete(user_id, event.id).await.unwrap();

    let report = sdk.reminder.dispatch().await.unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.sent, 0);
    assert_eq!(report.error, 1);
    assert!(app.mail.sent().is_empty());

    let reminder = app.ctx.repos.reminders.find(&due.id).await.unwrap().unwrap();
    assert_eq!(reminder.sent_status, SentStatus::Error);
}
