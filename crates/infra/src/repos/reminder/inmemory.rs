use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{DateTime, OwningItem, Reminder, SentStatus, Utc, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryReminderRepo {
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryReminderRepo {
    pub fn new(reminders: Arc<Mutex<Vec<Reminder>>>) -> Self {
        Self { reminders }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_by_item(
        &self,
        user_id: &ID,
        item: &OwningItem,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| {
            r.user_id == *user_id && r.item == *item
        });
        reminders.sort_by_key(|r| r.reminder_time);
        Ok(reminders)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| r.is_due(now));
        reminders.sort_by_key(|r| r.reminder_time);
        Ok(reminders)
    }

    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let claimed = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.sent_status == SentStatus::Pending,
            |r| {
                r.sent_status = SentStatus::InFlight;
                r.updated_at = now;
            },
        );
        Ok(claimed > 0)
    }

    async fn set_status(
        &self,
        reminder_id: &ID,
        status: SentStatus,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        update_many(
            &self.reminders,
            |r| r.id == *reminder_id,
            |r| {
                r.sent_status = status;
                r.updated_at = now;
            },
        );
        Ok(())
    }
}
