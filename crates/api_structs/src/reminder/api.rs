use crate::dtos::{DispatchReportDTO, ReminderDTO};
use agenda_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    pub reminders: Vec<ReminderDTO>,
}

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        }
    }
}

pub mod get_event_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod get_task_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub task_id: ID,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod send_reminders {
    use super::*;

    pub type APIResponse = DispatchReportDTO;
}
