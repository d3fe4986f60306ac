mod base;
mod event;
mod reminder;
mod status;
mod task;
mod user;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use event::CalendarEventClient;
pub use event::{CreateEventInput, UpdateEventInput};
use reminder::ReminderClient;
use status::StatusClient;
use std::sync::Arc;
use task::TaskClient;
pub use task::{CreateTaskInput, UpdateTaskInput};
use user::UserClient;
pub use user::CreateUserInput;

pub use agenda_api_structs::dtos::*;
pub use agenda_domain::{
    DateTime, ItemType, NaiveDate, NotificationMethod, SentStatus, TaskPriority, TaskStatus, Utc,
    ID,
};

// Domain
pub use agenda_api_structs::dtos::CalendarEventDTO as CalendarEvent;
pub use agenda_api_structs::dtos::DispatchReportDTO as DispatchReport;
pub use agenda_api_structs::dtos::ReminderDTO as Reminder;
pub use agenda_api_structs::dtos::TaskDTO as Task;
pub use agenda_api_structs::dtos::UserDTO as User;

/// Agenda Server SDK
///
/// The SDK contains methods for interacting with the Agenda server
/// API.
#[derive(Clone)]
pub struct AgendaSDK {
    pub event: CalendarEventClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub task: TaskClient,
    pub user: UserClient,
}

impl AgendaSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        let base = Arc::new(base);
        let event = CalendarEventClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let task = TaskClient::new(base.clone());
        let user = UserClient::new(base);

        Self {
            event,
            reminder,
            status,
            task,
            user,
        }
    }
}
