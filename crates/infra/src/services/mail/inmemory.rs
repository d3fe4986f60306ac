use super::{Delivery, IMailTransport, MailMessage};
use std::{collections::HashSet, sync::Mutex, time::Duration};

/// Mail transport that keeps every message in memory, used for testing.
/// Sends to recipients registered with `fail_for` fail.
#[derive(Default)]
pub struct InMemoryMailTransport {
    sent: Mutex<Vec<MailMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryMailTransport {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.to_string());
    }

    /// Makes every send wait for `delay` before completing
    pub fn delay_sends(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IMailTransport for InMemoryMailTransport {
    async fn send(&self, message: &MailMessage) -> anyhow::Result<Delivery> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&message.recipient)
        {
            anyhow::bail!("Mailbox unavailable: {}", message.recipient);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(Delivery::Sent)
    }
}
