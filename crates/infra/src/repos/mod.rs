mod event;
mod reminder;
mod shared;
mod task;
mod unit_of_work;
mod user;

pub use event::IEventRepo;
use event::{InMemoryEventRepo, PostgresEventRepo};
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::{Arc, Mutex};
pub use task::ITaskRepo;
use task::{InMemoryTaskRepo, PostgresTaskRepo};
use tracing::info;
pub use unit_of_work::{IUnitOfWork, IUnitOfWorkRepo};
use unit_of_work::{InMemoryUnitOfWorkRepo, PostgresUnitOfWorkRepo};
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub events: Arc<dyn IEventRepo>,
    pub tasks: Arc<dyn ITaskRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub units_of_work: Arc<dyn IUnitOfWorkRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            units_of_work: Arc::new(PostgresUnitOfWorkRepo::new(pool)),
        }
    }

    pub fn create_inmemory() -> Self {
        let users = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let tasks = Arc::new(Mutex::new(Vec::new()));
        let reminders = Arc::new(Mutex::new(Vec::new()));
        Self {
            users: Arc::new(InMemoryUserRepo::new(users)),
            events: Arc::new(InMemoryEventRepo::new(events.clone())),
            tasks: Arc::new(InMemoryTaskRepo::new(tasks.clone())),
            reminders: Arc::new(InMemoryReminderRepo::new(reminders.clone())),
            units_of_work: Arc::new(InMemoryUnitOfWorkRepo::new(events, tasks, reminders)),
        }
    }
}
