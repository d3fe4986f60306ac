use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// An item in the to-do list of a `User`
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: ID,
    pub user_id: ID,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Task {
    /// Flips the `TaskStatus` between pending and completed
    pub fn toggle_status(&mut self) {
        self.status = match self.status {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        };
    }

    /// Short version of the description used in notification subjects
    pub fn short_description(&self) -> String {
        self.description.chars().take(30).collect()
    }
}

impl Entity for Task {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Low
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(description: &str) -> Task {
        let now = Utc::now();
        Task {
            id: Default::default(),
            user_id: Default::default(),
            description: description.into(),
            due_date: None,
            priority: Default::default(),
            status: Default::default(),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn toggles_between_pending_and_completed() {
        let mut t = task("Buy milk");
        assert_eq!(t.status, TaskStatus::Pending);
        t.toggle_status();
        assert_eq!(t.status, TaskStatus::Completed);
        t.toggle_status();
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn short_description_is_char_boundary_safe() {
        let t = task("ééééééééééééééééééééééééééééééééééé");
        assert_eq!(t.short_description().chars().count(), 30);
        let t = task("short");
        assert_eq!(t.short_description(), "short");
    }

    #[test]
    fn priority_maps_to_stored_integers() {
        for p in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::from_i16(p.as_i16()), Some(p));
        }
        assert_eq!(TaskPriority::from_i16(0), None);
    }
}
