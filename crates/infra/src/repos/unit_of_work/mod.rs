mod inmemory;
mod postgres;

use agenda_domain::{CalendarEvent, OwningItem, Reminder, Task, ID};
pub use inmemory::InMemoryUnitOfWorkRepo;
pub use postgres::PostgresUnitOfWorkRepo;

/// Starts units of work
#[async_trait::async_trait]
pub trait IUnitOfWorkRepo: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn IUnitOfWork>>;
}

/// A set of writes that become visible together on `commit`. Dropping an
/// uncommitted unit of work discards all of its writes.
///
/// Failed `Reminder` writes do not invalidate the other writes of the
/// unit of work.
#[async_trait::async_trait]
pub trait IUnitOfWork: Send {
    async fn insert_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()>;
    async fn save_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()>;
    async fn insert_task(&mut self, task: &Task) -> anyhow::Result<()>;
    async fn save_task(&mut self, task: &Task) -> anyhow::Result<()>;
    /// Deletes the pending `Reminder`s of the item and returns how many were deleted
    async fn delete_pending_reminders(
        &mut self,
        user_id: &ID,
        item: &OwningItem,
    ) -> anyhow::Result<u64>;
    async fn insert_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::AgendaContext;
    use agenda_domain::{CalendarEvent, OwningItem, Reminder, SentStatus, ID};
    use chrono::{Duration, Utc};

    fn event() -> CalendarEvent {
        let now = Utc::now();
        CalendarEvent {
            id: Default::default(),
            user_id: Default::default(),
            title: "Standup".into(),
            description: Some("Daily".into()),
            start_time: now + Duration::hours(3),
            end_time: now + Duration::hours(4),
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn writes_are_visible_after_commit() {
        let ctx = AgendaContext::create_inmemory();
        let e = event();
        let now = Utc::now();
        let reminder = Reminder::new(e.user_id, OwningItem::Event(e.id), now, now);

        let mut uow = ctx.repos.units_of_work.begin().await.expect("To begin");
        uow.insert_event(&e).await.expect("To insert event");
        uow.insert_reminder(&reminder).await.expect("To insert reminder");
        assert!(ctx.repos.events.find(&e.id).await.unwrap().is_none());
        uow.commit().await.expect("To commit");

        assert_eq!(ctx.repos.events.find(&e.id).await.unwrap(), Some(e));
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap(),
            Some(reminder)
        );
    }

    #[tokio::test]
    async fn dropped_unit_of_work_writes_nothing() {
        let ctx = AgendaContext::create_inmemory();
        let e = event();

        let mut uow = ctx.repos.units_of_work.begin().await.expect("To begin");
        uow.insert_event(&e).await.expect("To insert event");
        drop(uow);

        assert!(ctx.repos.events.find(&e.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deletes_only_pending_reminders_of_item() {
        let ctx = AgendaContext::create_inmemory();
        let now = Utc::now();
        let user_id = ID::default();
        let item = OwningItem::Task(ID::default());
        let pending = Reminder::new(user_id, item, now, now);
        let mut sent = Reminder::new(user_id, item, now, now);
        sent.sent_status = SentStatus::Sent;
        let other = Reminder::new(user_id, OwningItem::Task(ID::default()), now, now);
        for r in [&pending, &sent, &other] {
            ctx.repos.reminders.insert(r).await.unwrap();
        }

        let mut uow = ctx.repos.units_of_work.begin().await.expect("To begin");
        let deleted = uow
            .delete_pending_reminders(&user_id, &item)
            .await
            .expect("To delete reminders");
        assert_eq!(deleted, 1);
        uow.commit().await.expect("To commit");

        assert!(ctx.repos.reminders.find(&pending.id).await.unwrap().is_none());
        assert!(ctx.repos.reminders.find(&sent.id).await.unwrap().is_some());
        assert!(ctx.repos.reminders.find(&other.id).await.unwrap().is_some());
    }
}
