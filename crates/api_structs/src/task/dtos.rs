use agenda_domain::{DateTime, NaiveDate, Task, TaskPriority, TaskStatus, Utc, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDTO {
    pub id: ID,
    pub user_id: ID,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl TaskDTO {
    pub fn new(task: Task) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            status: task.status,
            created: task.created,
            updated: task.updated,
        }
    }
}
