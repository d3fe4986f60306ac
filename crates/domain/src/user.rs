use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};

/// The owner of `CalendarEvent`s, `Task`s and their `Reminder`s
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub username: String,
    /// Address that `Reminder`s are delivered to. A `User` without
    /// an email address can not receive reminders.
    pub email: Option<String>,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: Option<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            username,
            email,
            created,
        }
    }

    /// The email address to deliver reminders to, if any usable one is set
    pub fn reminder_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
