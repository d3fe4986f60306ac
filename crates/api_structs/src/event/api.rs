use crate::dtos::CalendarEventDTO;
use agenda_domain::{CalendarEvent, DateTime, Utc, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventResponse {
    pub event: CalendarEventDTO,
}

impl CalendarEventResponse {
    pub fn new(event: CalendarEvent) -> Self {
        Self {
            event: CalendarEventDTO::new(event),
        }
    }
}

#[derive(Deserialize)]
pub struct UserPathParams {
    pub user_id: ID,
}

#[derive(Deserialize)]
pub struct EventPathParams {
    pub user_id: ID,
    pub event_id: ID,
}

/// Body used both when creating and when replacing a `CalendarEvent`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub mod create_event {
    use super::*;

    pub type PathParams = UserPathParams;
    pub type RequestBody = EventRequestBody;
    pub type APIResponse = CalendarEventResponse;
}

pub mod get_event {
    use super::*;

    pub type PathParams = EventPathParams;
    pub type APIResponse = CalendarEventResponse;
}

pub mod get_events {
    use super::*;

    pub type PathParams = UserPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<CalendarEventDTO>,
    }

    impl APIResponse {
        pub fn new(events: Vec<CalendarEvent>) -> Self {
            Self {
                events: events.into_iter().map(CalendarEventDTO::new).collect(),
            }
        }
    }
}

pub mod update_event {
    use super::*;

    pub type PathParams = EventPathParams;
    pub type RequestBody = EventRequestBody;
    pub type APIResponse = CalendarEventResponse;
}

pub mod delete_event {
    use super::*;

    pub type PathParams = EventPathParams;
    pub type APIResponse = CalendarEventResponse;
}
