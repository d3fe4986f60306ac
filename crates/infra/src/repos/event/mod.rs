mod inmemory;
mod postgres;

use agenda_domain::{CalendarEvent, ID};
pub use inmemory::InMemoryEventRepo;
pub(crate) use postgres::{INSERT_EVENT, UPDATE_EVENT};
pub use postgres::PostgresEventRepo;

/// Transactional writes of `CalendarEvent`s go through the `IUnitOfWork`
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>>;
    /// All `CalendarEvent`s of the `User` ordered by start time
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<CalendarEvent>>;
    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>>;
}
