use crate::dtos::TaskDTO;
use agenda_domain::{NaiveDate, Task, TaskPriority, TaskStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task: TaskDTO,
}

impl TaskResponse {
    pub fn new(task: Task) -> Self {
        Self {
            task: TaskDTO::new(task),
        }
    }
}

#[derive(Deserialize)]
pub struct TaskPathParams {
    pub user_id: ID,
    pub task_id: ID,
}

pub mod create_task {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub description: String,
        #[serde(default)]
        pub due_date: Option<NaiveDate>,
        #[serde(default)]
        pub priority: Option<TaskPriority>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod get_task {
    use super::*;

    pub type PathParams = TaskPathParams;
    pub type APIResponse = TaskResponse;
}

pub mod get_tasks {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub tasks: Vec<TaskDTO>,
    }

    impl APIResponse {
        pub fn new(tasks: Vec<Task>) -> Self {
            Self {
                tasks: tasks.into_iter().map(TaskDTO::new).collect(),
            }
        }
    }
}

pub mod update_task {
    use super::*;

    pub type PathParams = TaskPathParams;

    /// Replaces the editable fields of the `Task`. The status is kept when omitted.
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub description: String,
        #[serde(default)]
        pub due_date: Option<NaiveDate>,
        #[serde(default)]
        pub priority: Option<TaskPriority>,
        #[serde(default)]
        pub status: Option<TaskStatus>,
    }

    pub type APIResponse = TaskResponse;
}

pub mod toggle_task {
    use super::*;

    pub type PathParams = TaskPathParams;
    pub type APIResponse = TaskResponse;
}

pub mod delete_task {
    use super::*;

    pub type PathParams = TaskPathParams;
    pub type APIResponse = TaskResponse;
}
