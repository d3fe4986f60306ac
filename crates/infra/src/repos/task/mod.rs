mod inmemory;
mod postgres;

use agenda_domain::{Task, ID};
pub use inmemory::InMemoryTaskRepo;
pub(crate) use postgres::{INSERT_TASK, UPDATE_TASK};
pub use postgres::PostgresTaskRepo;

#[async_trait::async_trait]
pub trait ITaskRepo: Send + Sync {
    async fn insert(&self, task: &Task) -> anyhow::Result<()>;
    /// Saves the `Task` without touching its `Reminder`s
    async fn save(&self, task: &Task) -> anyhow::Result<()>;
    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>>;
    /// All `Task`s of the `User`, the ones with the earliest due date first
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Task>>;
    async fn delete(&self, task_id: &ID) -> anyhow::Result<Option<Task>>;
}
