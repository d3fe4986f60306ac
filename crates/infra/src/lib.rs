mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, ReminderConfig};
pub use repos::{
    IEventRepo, IReminderRepo, ITaskRepo, IUnitOfWork, IUnitOfWorkRepo, IUserRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AgendaContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mail: Arc<dyn IMailTransport>,
}

impl AgendaContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(url) => Repos::create_postgres(url).await?,
            None => {
                warn!("DATABASE_URL is not set. Going to use the in-memory store which is lost on shutdown.");
                Repos::create_inmemory()
            }
        };
        let mail: Arc<dyn IMailTransport> = Arc::new(SmtpMailTransport::new(&config.mail)?);
        info!(
            "Reminder emails go through {}:{} as {}",
            config.mail.server, config.mail.port, config.mail.default_sender
        );

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mail,
        })
    }

    /// Context backed by in-memory repos and mail transport
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            mail: Arc::new(InMemoryMailTransport::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<AgendaContext> {
    AgendaContext::create(Config::new()).await
}
