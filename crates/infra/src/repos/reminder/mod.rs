mod inmemory;
mod postgres;

use agenda_domain::{DateTime, OwningItem, Reminder, SentStatus, Utc, ID};
pub use inmemory::InMemoryReminderRepo;
pub(crate) use postgres::INSERT_REMINDER;
pub use postgres::PostgresReminderRepo;

/// `Reminder`s are created and superseded inside an `IUnitOfWork`. This repo
/// covers reading them and moving them through their delivery states.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    /// All `Reminder`s of the given item regardless of status, earliest first
    async fn find_by_item(&self, user_id: &ID, item: &OwningItem)
        -> anyhow::Result<Vec<Reminder>>;
    /// Pending `Reminder`s with `reminder_time <= now`, earliest first
    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>>;
    /// Atomically moves a pending `Reminder` to in flight. Returns false when
    /// the `Reminder` is no longer pending.
    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool>;
    /// Moves a claimed `Reminder` into a terminal `SentStatus`
    async fn set_status(
        &self,
        reminder_id: &ID,
        status: SentStatus,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}
