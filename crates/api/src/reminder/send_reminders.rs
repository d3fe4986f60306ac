use super::message::{reminder_message, ReminderSubject};
use crate::{
    error::AgendaError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::{dtos::DispatchReportDTO, send_reminders::APIResponse};
use agenda_domain::{OwningItem, Reminder, SentStatus, User};
use agenda_infra::{AgendaContext, Delivery};
use tracing::{error, info, warn};

pub async fn send_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    protect_route(&http_req, &ctx)?;

    dispatch_reminders(&ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::from(report)))
        .map_err(AgendaError::from)
}

/// Delivers every due `Reminder` once
pub async fn dispatch_reminders(ctx: &AgendaContext) -> Result<DispatchReport, DispatchError> {
    execute(SendRemindersUseCase {}, ctx).await
}

/// Scans the due pending `Reminder`s and emails them one by one, earliest
/// first. Each `Reminder` ends up either sent or in error, and one failing
/// `Reminder` does not stop the others from being processed.
#[derive(Debug)]
pub struct SendRemindersUseCase {}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// `Reminder`s claimed by this dispatch
    pub attempted: usize,
    pub sent: usize,
    pub error: usize,
}

impl From<DispatchReport> for DispatchReportDTO {
    fn from(report: DispatchReport) -> Self {
        Self {
            attempted: report.attempted,
            sent: report.sent,
            error: report.error,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum DispatchError {
    StorageError,
}

impl From<DispatchError> for AgendaError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::StorageError => Self::InternalError,
        }
    }
}

/// Why a claimed `Reminder` could not be handed to the mail transport
#[derive(Debug)]
enum ResolveError {
    UserNotFound,
    ItemNotFound,
    MissingEmail,
    Storage(anyhow::Error),
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    type Response = DispatchReport;
    type Error = DispatchError;

    const NAME: &'static str = "SendReminders";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due = ctx
            .repos
            .reminders
            .find_due(now)
            .await
            .map_err(|_| DispatchError::StorageError)?;

        let mut report = DispatchReport::default();
        for reminder in due {
            match ctx.repos.reminders.claim(&reminder.id, ctx.sys.now()).await {
                Ok(true) => (),
                // Taken by a concurrent dispatch
                Ok(false) => continue,
                Err(e) => {
                    error!("Unable to claim reminder {}: {:?}", reminder.id, e);
                    continue;
                }
            }
            report.attempted += 1;

            let status = deliver(&reminder, ctx).await;
            match ctx
                .repos
                .reminders
                .set_status(&reminder.id, status, ctx.sys.now())
                .await
            {
                Ok(()) if status == SentStatus::Sent => report.sent += 1,
                Ok(()) => report.error += 1,
                Err(e) => {
                    // Stays in flight, so it is never sent twice
                    error!(
                        "Unable to mark reminder {} as {}: {:?}",
                        reminder.id, status, e
                    );
                    report.error += 1;
                }
            }
        }

        if report.attempted > 0 {
            info!(
                "Dispatched {} reminders: {} sent, {} failed",
                report.attempted, report.sent, report.error
            );
        }
        Ok(report)
    }
}

/// Tries to email the `Reminder` and returns its terminal status
async fn deliver(reminder: &Reminder, ctx: &AgendaContext) -> SentStatus {
    let (user, recipient, item) = match resolve(reminder, ctx).await {
        Ok(resolved) => resolved,
        Err(ResolveError::Storage(e)) => {
            error!(
                "Unable to look up the recipient of reminder {}: {:?}",
                reminder.id, e
            );
            return SentStatus::Error;
        }
        Err(e) => {
            warn!(
                "Reminder {} for {} of user {} can not be delivered: {:?}",
                reminder.id, reminder.item, reminder.user_id, e
            );
            return SentStatus::Error;
        }
    };

    let message = reminder_message(&user, &recipient, &item);
    let timeout = ctx.config.reminders.send_timeout;
    match tokio::time::timeout(timeout, ctx.mail.send(&message)).await {
        Ok(Ok(Delivery::Sent)) => {
            info!(
                "Sent reminder {} to {} for {}",
                reminder.id, recipient, reminder.item
            );
            SentStatus::Sent
        }
        Ok(Ok(Delivery::Suppressed)) => {
            info!(
                "Sending is suppressed, reminder {} for {} was not delivered to {} but is marked as sent",
                reminder.id, reminder.item, recipient
            );
            SentStatus::Sent
        }
        Ok(Err(e)) => {
            error!(
                "Error sending email for reminder {} to {}: {:?}",
                reminder.id, recipient, e
            );
            SentStatus::Error
        }
        Err(_) => {
            error!(
                "Sending email for reminder {} to {} timed out after {:?}",
                reminder.id, recipient, timeout
            );
            SentStatus::Error
        }
    }
}

async fn resolve(
    reminder: &Reminder,
    ctx: &AgendaContext,
) -> Result<(User, String, ReminderSubject), ResolveError> {
    let user = ctx
        .repos
        .users
        .find(&reminder.user_id)
        .await
        .map_err(ResolveError::Storage)?
        .ok_or(ResolveError::UserNotFound)?;

    let item = match reminder.item {
        OwningItem::Event(event_id) => ctx
            .repos
            .events
            .find(&event_id)
            .await
            .map_err(ResolveError::Storage)?
            .filter(|e| e.user_id == user.id)
            .map(ReminderSubject::Event),
        OwningItem::Task(task_id) => ctx
            .repos
            .tasks
            .find(&task_id)
            .await
            .map_err(ResolveError::Storage)?
            .filter(|task| task.user_id == user.id)
            .map(ReminderSubject::Task),
    }
    .ok_or(ResolveError::ItemNotFound)?;

    let recipient = user
        .reminder_address()
        .ok_or(ResolveError::MissingEmail)?
        .to_string();

    Ok((user, recipient, item))
}

#[cfg(test)]
mod test {
    use super::*;
    use agenda_domain::{CalendarEvent, NaiveDate, Task, ID};
    use agenda_infra::{
        IMailTransport, IReminderRepo, InMemoryMailTransport, MailMessage, StaticTimeSys,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    struct TestContext {
        ctx: AgendaContext,
        mail: Arc<InMemoryMailTransport>,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn setup() -> TestContext {
        let mut ctx = AgendaContext::create_inmemory();
        let mail = Arc::new(InMemoryMailTransport::new());
        ctx.mail = mail.clone();
        ctx.sys = Arc::new(StaticTimeSys(now()));
        TestContext { ctx, mail }
    }

    async fn insert_user(ctx: &AgendaContext, username: &str, email: Option<&str>) -> User {
        let user = User::new(username.into(), email.map(String::from), now());
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    async fn insert_event(ctx: &AgendaContext, user: &User, title: &str) -> CalendarEvent {
        let e = CalendarEvent {
            id: Default::default(),
            user_id: user.id,
            title: title.into(),
            description: None,
            start_time: now() + Duration::minutes(30),
            end_time: now() + Duration::minutes(90),
            created: now(),
            updated: now(),
        };
        ctx.repos.events.insert(&e).await.unwrap();
        e
    }

    async fn insert_reminder(
        ctx: &AgendaContext,
        user_id: ID,
        item: OwningItem,
        minutes_ago: i64,
    ) -> Reminder {
        let reminder = Reminder::new(
            user_id,
            item,
            now() - Duration::minutes(minutes_ago),
            now() - Duration::hours(1),
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn status_of(ctx: &AgendaContext, reminder: &Reminder) -> SentStatus {
        ctx.repos
            .reminders
            .find(&reminder.id)
            .await
            .unwrap()
            .expect("To find reminder")
            .sent_status
    }

    #[actix_web::main]
    #[test]
    async fn sends_due_reminder_once() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(
            report,
            DispatchReport {
                attempted: 1,
                sent: 1,
                error: 0
            }
        );
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap().unwrap();
        assert_eq!(stored.sent_status, SentStatus::Sent);
        assert_eq!(stored.updated_at, now());
        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Event Reminder: Dentist");
        assert_eq!(sent[0].recipient, "ann@example.com");

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report, DispatchReport::default());
        assert_eq!(mail.sent().len(), 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Sent);
    }

    #[actix_web::main]
    #[test]
    async fn one_failing_send_does_not_stop_the_batch() {
        let TestContext { ctx, mail } = setup();
        let ann = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let bob = insert_user(&ctx, "bob", Some("bob@example.com")).await;
        let cid = insert_user(&ctx, "cid", Some("cid@example.com")).await;
        mail.fail_for("bob@example.com");

        let mut reminders = Vec::new();
        for (user, minutes_ago) in [(&ann, 3), (&bob, 2), (&cid, 1)] {
            let e = insert_event(&ctx, user, "Standup").await;
            reminders.push(insert_reminder(&ctx, user.id, OwningItem::Event(e.id), minutes_ago).await);
        }

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(
            report,
            DispatchReport {
                attempted: 3,
                sent: 2,
                error: 1
            }
        );
        assert_eq!(status_of(&ctx, &reminders[0]).await, SentStatus::Sent);
        assert_eq!(status_of(&ctx, &reminders[1]).await, SentStatus::Error);
        assert_eq!(status_of(&ctx, &reminders[2]).await, SentStatus::Sent);
    }

    #[actix_web::main]
    #[test]
    async fn marks_orphaned_reminders_as_error() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;
        ctx.repos.events.delete(&e.id).await.unwrap();

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report.error, 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Error);
        assert!(mail.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn marks_unresolvable_recipients_as_error() {
        let TestContext { ctx, mail } = setup();
        let no_email = insert_user(&ctx, "ann", None).await;
        let e = insert_event(&ctx, &no_email, "Dentist").await;
        let without_email = insert_reminder(&ctx, no_email.id, OwningItem::Event(e.id), 3).await;
        let without_user =
            insert_reminder(&ctx, ID::default(), OwningItem::Task(ID::default()), 2).await;
        let other = insert_user(&ctx, "bob", Some("bob@example.com")).await;
        let foreign_item = insert_reminder(&ctx, other.id, OwningItem::Event(e.id), 1).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(
            report,
            DispatchReport {
                attempted: 3,
                sent: 0,
                error: 3
            }
        );
        for reminder in [&without_email, &without_user, &foreign_item] {
            assert_eq!(status_of(&ctx, reminder).await, SentStatus::Error);
        }
        assert!(mail.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn sends_earliest_reminders_first() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let later = insert_event(&ctx, &user, "Later").await;
        let earlier = insert_event(&ctx, &user, "Earlier").await;
        insert_reminder(&ctx, user.id, OwningItem::Event(later.id), 1).await;
        insert_reminder(&ctx, user.id, OwningItem::Event(earlier.id), 10).await;

        dispatch_reminders(&ctx).await.expect("To dispatch");
        let subjects = mail
            .sent()
            .into_iter()
            .map(|msg| msg.subject)
            .collect::<Vec<_>>();
        assert_eq!(
            subjects,
            vec!["Event Reminder: Earlier", "Event Reminder: Later"]
        );
    }

    #[actix_web::main]
    #[test]
    async fn ignores_reminders_not_yet_due() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), -1).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report, DispatchReport::default());
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Pending);
        assert!(mail.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn sends_task_reminders() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let task = Task {
            id: Default::default(),
            user_id: user.id,
            description: "Renew passport".into(),
            due_date: NaiveDate::from_ymd_opt(2030, 6, 1),
            priority: Default::default(),
            status: Default::default(),
            created: now(),
            updated: now(),
        };
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Task(task.id), 180).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report.sent, 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Sent);
        assert_eq!(mail.sent()[0].subject, "Task Reminder: Renew passport...");
    }

    #[actix_web::main]
    #[test]
    async fn slow_sends_time_out_as_errors() {
        let TestContext { mut ctx, mail } = setup();
        ctx.config.reminders.send_timeout = std::time::Duration::from_millis(20);
        mail.delay_sends(std::time::Duration::from_millis(500));
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report.error, 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Error);
    }

    struct SuppressedMailTransport;

    #[async_trait::async_trait]
    impl IMailTransport for SuppressedMailTransport {
        async fn send(&self, _message: &MailMessage) -> anyhow::Result<Delivery> {
            Ok(Delivery::Suppressed)
        }
    }

    #[actix_web::main]
    #[test]
    async fn suppressed_sends_count_as_sent() {
        let TestContext { mut ctx, .. } = setup();
        ctx.mail = Arc::new(SuppressedMailTransport);
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report.sent, 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::Sent);
    }

    #[actix_web::main]
    #[test]
    async fn skips_reminders_claimed_elsewhere() {
        let TestContext { ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;
        assert!(ctx.repos.reminders.claim(&reminder.id, now()).await.unwrap());

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report, DispatchReport::default());
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::InFlight);
        assert!(mail.sent().is_empty());
    }

    struct UnwritableStatusRepo {
        inner: Arc<dyn IReminderRepo>,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for UnwritableStatusRepo {
        async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
            self.inner.insert(reminder).await
        }

        async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
            self.inner.find(reminder_id).await
        }

        async fn find_by_item(
            &self,
            user_id: &ID,
            item: &OwningItem,
        ) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_by_item(user_id, item).await
        }

        async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_due(now).await
        }

        async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool> {
            self.inner.claim(reminder_id, now).await
        }

        async fn set_status(
            &self,
            _reminder_id: &ID,
            _status: SentStatus,
            _now: DateTime<Utc>,
        ) -> anyhow::Result<()> {
            anyhow::bail!("Connection to the database was lost")
        }
    }

    #[actix_web::main]
    #[test]
    async fn unsaved_outcomes_are_counted_as_errors() {
        let TestContext { mut ctx, mail } = setup();
        let user = insert_user(&ctx, "ann", Some("ann@example.com")).await;
        let e = insert_event(&ctx, &user, "Dentist").await;
        let reminder = insert_reminder(&ctx, user.id, OwningItem::Event(e.id), 1).await;
        ctx.repos.reminders = Arc::new(UnwritableStatusRepo {
            inner: ctx.repos.reminders.clone(),
        });

        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(
            report,
            DispatchReport {
                attempted: 1,
                sent: 0,
                error: 1
            }
        );
        assert_eq!(mail.sent().len(), 1);
        assert_eq!(status_of(&ctx, &reminder).await, SentStatus::InFlight);

        // Never picked up again
        let report = dispatch_reminders(&ctx).await.expect("To dispatch");
        assert_eq!(report, DispatchReport::default());
        assert_eq!(mail.sent().len(), 1);
    }
}
