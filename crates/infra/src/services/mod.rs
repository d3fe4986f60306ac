mod mail;

pub use mail::{Delivery, IMailTransport, InMemoryMailTransport, MailConfig, MailMessage, SmtpMailTransport};
