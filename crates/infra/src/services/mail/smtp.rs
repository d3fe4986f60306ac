use super::{Delivery, IMailTransport, MailConfig, MailMessage};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
enum Encryption {
    Plain,
    StartTls,
    Implicit,
}

impl Encryption {
    fn of(config: &MailConfig) -> Self {
        if config.use_ssl {
            Self::Implicit
        } else if config.use_tls {
            Self::StartTls
        } else {
            Self::Plain
        }
    }
}

pub struct SmtpMailTransport {
    sender: Mailbox,
    suppress_send: bool,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let sender = config.default_sender.parse::<Mailbox>()?;

        let builder = match Encryption::of(config) {
            Encryption::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)?,
            Encryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            }
            Encryption::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            }
        };
        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            sender,
            suppress_send: config.suppress_send,
            transport: builder.build(),
        })
    }

    fn build_message(&self, message: &MailMessage) -> anyhow::Result<Message> {
        let email = Message::builder()
            .from(self.sender.clone())
            .to(message.recipient.parse::<Mailbox>()?)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))?;
        Ok(email)
    }
}

#[async_trait::async_trait]
impl IMailTransport for SmtpMailTransport {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<Delivery> {
        // Build even when suppressed so that malformed addresses fail the same way
        let email = self.build_message(message)?;

        if self.suppress_send {
            info!(
                "Suppressed email to {} with subject: {}\n{}",
                message.recipient, message.subject, message.text_body
            );
            return Ok(Delivery::Suppressed);
        }

        self.transport.send(email).await?;
        Ok(Delivery::Sent)
    }
}
