use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};

/// An entry in the calendar of a `User`
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn has_valid_timespan(&self) -> bool {
        self.end_time >= self.start_time
    }
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}
