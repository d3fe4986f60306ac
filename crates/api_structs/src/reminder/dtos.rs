use agenda_domain::{DateTime, ItemType, NotificationMethod, Reminder, SentStatus, Utc, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub item_type: ItemType,
    pub item_id: ID,
    pub reminder_time: DateTime<Utc>,
    pub notification_method: NotificationMethod,
    pub sent_status: SentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            item_type: reminder.item.item_type(),
            item_id: *reminder.item.item_id(),
            reminder_time: reminder.reminder_time,
            notification_method: reminder.notification_method,
            sent_status: reminder.sent_status,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

/// Outcome of one run of the reminder dispatch
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReportDTO {
    pub attempted: usize,
    pub sent: usize,
    pub error: usize,
}
