mod event;
mod reminder;
mod shared;
mod task;
mod user;

pub use event::CalendarEvent;
pub use reminder::{
    derive_for_event, derive_for_task, ItemType, NotificationMethod, OwningItem, Remindable,
    Reminder, SentStatus, EVENT_REMINDER_BUFFER_MINUTES, EVENT_REMINDER_LEAD_MINUTES,
    TASK_REMINDER_HOUR,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use task::{Task, TaskPriority, TaskStatus};
pub use user::User;

pub use chrono::{DateTime, NaiveDate, Utc};
