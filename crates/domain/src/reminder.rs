use crate::{
    shared::entity::{Entity, ID},
    CalendarEvent, Task,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// How long before the start of a `CalendarEvent` its `Reminder` fires
pub const EVENT_REMINDER_LEAD_MINUTES: i64 = 60;
/// `CalendarEvent`s starting sooner than this get no `Reminder`
pub const EVENT_REMINDER_BUFFER_MINUTES: i64 = 5;
/// Hour of the due date at which a `Task` `Reminder` fires
pub const TASK_REMINDER_HOUR: u32 = 9;

/// A `Reminder` is a scheduled notification for one `CalendarEvent` or `Task`
/// that is delivered once at or after `reminder_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `User` which should be notified
    pub user_id: ID,
    /// The `CalendarEvent` or `Task` this `Reminder` belongs to
    pub item: OwningItem,
    /// The instant at which the `Reminder` becomes due
    pub reminder_time: DateTime<Utc>,
    pub notification_method: NotificationMethod,
    pub sent_status: SentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates a new pending email `Reminder`
    pub fn new(
        user_id: ID,
        item: OwningItem,
        reminder_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            item,
            reminder_time,
            notification_method: NotificationMethod::Email,
            sent_status: SentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.sent_status == SentStatus::Pending && self.reminder_time <= now
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The item a `Reminder` is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwningItem {
    Event(ID),
    Task(ID),
}

impl OwningItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Event(_) => ItemType::Event,
            Self::Task(_) => ItemType::Task,
        }
    }

    pub fn item_id(&self) -> &ID {
        match self {
            Self::Event(id) | Self::Task(id) => id,
        }
    }

    pub fn from_parts(item_type: ItemType, item_id: ID) -> Self {
        match item_type {
            ItemType::Event => Self::Event(item_id),
            ItemType::Task => Self::Task(item_id),
        }
    }
}

impl Display for OwningItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.item_type(), self.item_id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Event,
    Task,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Task => "task",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "task" => Ok(Self::Task),
            _ => Err(format!("Unknown reminder item type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    Email,
}

impl NotificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
        }
    }
}

impl FromStr for NotificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            _ => Err(format!("Unknown notification method: {}", s)),
        }
    }
}

/// Delivery state of a `Reminder`.
///
/// `Pending` -> `InFlight` -> `Sent` | `Error`. `InFlight` marks a `Reminder`
/// claimed by a running dispatch so that concurrent dispatches never pick
/// up the same `Reminder`. `Sent` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentStatus {
    Pending,
    InFlight,
    Sent,
    Error,
}

impl SentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Sent => "sent",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Error)
    }
}

impl Display for SentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_flight" => Ok(Self::InFlight),
            "sent" => Ok(Self::Sent),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown reminder status: {}", s)),
        }
    }
}

/// Something a `Reminder` can be derived from
pub trait Remindable {
    fn user_id(&self) -> &ID;
    fn owning_item(&self) -> OwningItem;
    /// Computes when the `Reminder` for this item should fire, if at all
    fn reminder_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// One hour before the start of the event, unless the event starts within
/// the next few minutes or the reminder instant has already passed.
pub fn derive_for_event(event: &CalendarEvent, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if event.start_time <= now + Duration::minutes(EVENT_REMINDER_BUFFER_MINUTES) {
        return None;
    }
    let trigger = event.start_time - Duration::minutes(EVENT_REMINDER_LEAD_MINUTES);
    if trigger > now {
        Some(trigger)
    } else {
        None
    }
}

/// 09:00 UTC on the due date, if the task has a due date that is today or
/// later and that instant has not passed yet.
pub fn derive_for_task(task: &Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let due_date = task.due_date?;
    if due_date < now.date_naive() {
        return None;
    }
    let trigger = Utc.from_utc_datetime(&due_date.and_hms_opt(TASK_REMINDER_HOUR, 0, 0)?);
    if trigger > now {
        Some(trigger)
    } else {
        None
    }
}

impl Remindable for CalendarEvent {
    fn user_id(&self) -> &ID {
        &self.user_id
    }

    fn owning_item(&self) -> OwningItem {
        OwningItem::Event(self.id)
    }

    fn reminder_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        derive_for_event(self, now)
    }
}

impl Remindable for Task {
    fn user_id(&self) -> &ID {
        &self.user_id
    }

    fn owning_item(&self) -> OwningItem {
        OwningItem::Task(self.id)
    }

    fn reminder_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        derive_for_task(self, now)
    }
}
