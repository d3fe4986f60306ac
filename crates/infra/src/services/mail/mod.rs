mod inmemory;
mod smtp;

pub use inmemory::InMemoryMailTransport;
pub use smtp::SmtpMailTransport;

/// Settings of the outgoing mail server
#[derive(Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    /// Upgrades the connection with STARTTLS
    pub use_tls: bool,
    /// Connects over implicit TLS, usually on port 465. Wins over `use_tls`.
    pub use_ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Address every email is sent from
    pub default_sender: String,
    /// When set nothing is delivered, every send is reported as `Delivery::Suppressed`
    pub suppress_send: bool,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("use_ssl", &self.use_ssl)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("default_sender", &self.default_sender)
            .field("suppress_send", &self.suppress_send)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub recipient: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Outcome of a successful send
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delivery {
    /// Handed over to the mail server
    Sent,
    /// Sending is disabled, nothing left the process
    Suppressed,
}

#[async_trait::async_trait]
pub trait IMailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<Delivery>;
}
