mod inmemory;
mod postgres;

use agenda_domain::{User, ID};
pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn delete(&self, user_id: &ID) -> anyhow::Result<Option<User>>;
}
