use agenda_domain::{DateTime, OwningItem, Remindable, Reminder, Utc};
use agenda_infra::IUnitOfWork;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unable to remove the pending reminders of {item}: {error}")]
    RemovePending {
        item: OwningItem,
        error: anyhow::Error,
    },
    #[error("Unable to schedule a reminder for {item}: {error}")]
    Schedule {
        item: OwningItem,
        error: anyhow::Error,
    },
}

/// Replaces the pending `Reminder` of the item with a freshly derived one.
///
/// Runs inside the unit of work that saves the item. The unit of work stays
/// usable when this fails, so callers log the error and commit anyway.
pub async fn sync_reminder(
    uow: &mut dyn IUnitOfWork,
    item: &impl Remindable,
    now: DateTime<Utc>,
) -> Result<(), SyncError> {
    let owning_item = item.owning_item();

    let removed = uow
        .delete_pending_reminders(item.user_id(), &owning_item)
        .await
        .map_err(|error| SyncError::RemovePending {
            item: owning_item,
            error,
        })?;

    let reminder_time = match item.reminder_time(now) {
        Some(reminder_time) => reminder_time,
        None => {
            if removed > 0 {
                info!("Removed the pending reminder of {}", owning_item);
            }
            return Ok(());
        }
    };

    let reminder = Reminder::new(*item.user_id(), owning_item, reminder_time, now);
    uow.insert_reminder(&reminder)
        .await
        .map_err(|error| SyncError::Schedule {
            item: owning_item,
            error,
        })?;
    info!(
        "Scheduled reminder {} for {} at {}",
        reminder.id, owning_item, reminder_time
    );

    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use agenda_domain::{CalendarEvent, NaiveDate, SentStatus, Task, ID};
    use agenda_infra::{AgendaContext, IUnitOfWorkRepo};
    use anyhow::bail;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    /// Unit of work whose `Reminder` writes always fail
    pub struct BrokenRemindersUnitOfWork(pub Box<dyn IUnitOfWork>);

    #[async_trait::async_trait]
    impl IUnitOfWork for BrokenRemindersUnitOfWork {
        async fn insert_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
            self.0.insert_event(e).await
        }

        async fn save_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
            self.0.save_event(e).await
        }

        async fn insert_task(&mut self, task: &Task) -> anyhow::Result<()> {
            self.0.insert_task(task).await
        }

        async fn save_task(&mut self, task: &Task) -> anyhow::Result<()> {
            self.0.save_task(task).await
        }

        async fn delete_pending_reminders(
            &mut self,
            _user_id: &ID,
            _item: &OwningItem,
        ) -> anyhow::Result<u64> {
            bail!("reminders table is unavailable")
        }

        async fn insert_reminder(&mut self, _reminder: &Reminder) -> anyhow::Result<()> {
            bail!("reminders table is unavailable")
        }

        async fn commit(self: Box<Self>) -> anyhow::Result<()> {
            self.0.commit().await
        }
    }

    pub struct BrokenRemindersUnitOfWorkRepo(pub Arc<dyn IUnitOfWorkRepo>);

    #[async_trait::async_trait]
    impl IUnitOfWorkRepo for BrokenRemindersUnitOfWorkRepo {
        async fn begin(&self) -> anyhow::Result<Box<dyn IUnitOfWork>> {
            let uow = self.0.begin().await?;
            Ok(Box::new(BrokenRemindersUnitOfWork(uow)))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(start_time: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: Default::default(),
            user_id: Default::default(),
            title: "Lunch".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::hours(1),
            created: now(),
            updated: now(),
        }
    }

    async fn sync(ctx: &AgendaContext, item: &impl Remindable) -> Result<(), SyncError> {
        let mut uow = ctx.repos.units_of_work.begin().await.unwrap();
        let res = sync_reminder(uow.as_mut(), item, now()).await;
        uow.commit().await.unwrap();
        res
    }

    async fn reminders_of(ctx: &AgendaContext, item: &impl Remindable) -> Vec<Reminder> {
        ctx.repos
            .reminders
            .find_by_item(item.user_id(), &item.owning_item())
            .await
            .unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn keeps_one_pending_reminder_per_item() {
        let ctx = AgendaContext::create_inmemory();
        let mut e = event(now() + Duration::hours(3));
        sync(&ctx, &e).await.expect("To sync reminder");

        e.start_time = now() + Duration::hours(5);
        sync(&ctx, &e).await.expect("To sync reminder");

        let reminders = reminders_of(&ctx, &e).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].reminder_time, now() + Duration::hours(4));
        assert_eq!(reminders[0].sent_status, SentStatus::Pending);
        assert_eq!(reminders[0].item, OwningItem::Event(e.id));
        assert_eq!(reminders[0].user_id, e.user_id);
    }

    #[actix_web::main]
    #[test]
    async fn moving_event_to_the_past_removes_reminder() {
        let ctx = AgendaContext::create_inmemory();
        let mut e = event(now() + Duration::hours(3));
        sync(&ctx, &e).await.expect("To sync reminder");
        assert_eq!(reminders_of(&ctx, &e).await.len(), 1);

        e.start_time = now() - Duration::hours(1);
        sync(&ctx, &e).await.expect("To sync reminder");
        assert!(reminders_of(&ctx, &e).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn clearing_due_date_removes_reminder() {
        let ctx = AgendaContext::create_inmemory();
        let mut task = Task {
            id: Default::default(),
            user_id: Default::default(),
            description: "File taxes".into(),
            due_date: NaiveDate::from_ymd_opt(2030, 6, 3),
            priority: Default::default(),
            status: Default::default(),
            created: now(),
            updated: now(),
        };
        sync(&ctx, &task).await.expect("To sync reminder");
        let reminders = reminders_of(&ctx, &task).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(
            reminders[0].reminder_time,
            Utc.with_ymd_and_hms(2030, 6, 3, 9, 0, 0).unwrap()
        );

        task.due_date = None;
        sync(&ctx, &task).await.expect("To sync reminder");
        assert!(reminders_of(&ctx, &task).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn leaves_processed_reminders_alone() {
        let ctx = AgendaContext::create_inmemory();
        let e = event(now() + Duration::hours(3));
        let mut sent = Reminder::new(e.user_id, OwningItem::Event(e.id), now(), now());
        sent.sent_status = SentStatus::Sent;
        ctx.repos.reminders.insert(&sent).await.unwrap();

        sync(&ctx, &e).await.expect("To sync reminder");

        let reminders = reminders_of(&ctx, &e).await;
        assert_eq!(reminders.len(), 2);
        assert!(reminders.iter().any(|r| r.id == sent.id));
    }

    #[actix_web::main]
    #[test]
    async fn reports_failing_reminder_writes() {
        let ctx = AgendaContext::create_inmemory();
        let uow = ctx.repos.units_of_work.begin().await.unwrap();
        let mut uow = BrokenRemindersUnitOfWork(uow);
        let e = event(now() + Duration::hours(3));

        let res = sync_reminder(&mut uow, &e, now()).await;
        assert!(matches!(res, Err(SyncError::RemovePending { .. })));
    }
}
