use crate::{APIResponse, BaseClient, ID};
use agenda_api_structs::*;
use agenda_domain::{NaiveDate, TaskPriority, TaskStatus};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskClient {
    base: Arc<BaseClient>,
}

pub struct CreateTaskInput {
    pub user_id: ID,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

pub struct UpdateTaskInput {
    pub user_id: ID,
    pub task_id: ID,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateTaskInput) -> APIResponse<create_task::APIResponse> {
        let body = create_task::RequestBody {
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
        };

        self.base
            .post(
                body,
                format!("users/{}/tasks", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(&self, user_id: ID, task_id: ID) -> APIResponse<get_task::APIResponse> {
        self.base
            .get(
                format!("users/{}/tasks/{}", user_id, task_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_user(&self, user_id: ID) -> APIResponse<get_tasks::APIResponse> {
        self.base
            .get(format!("users/{}/tasks", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateTaskInput) -> APIResponse<update_task::APIResponse> {
        let body = update_task::RequestBody {
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: input.status,
        };

        self.base
            .put(
                body,
                format!("users/{}/tasks/{}", input.user_id, input.task_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn toggle(&self, user_id: ID, task_id: ID) -> APIResponse<toggle_task::APIResponse> {
        self.base
            .post(
                (),
                format!("users/{}/tasks/{}/toggle", user_id, task_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, user_id: ID, task_id: ID) -> APIResponse<delete_task::APIResponse> {
        self.base
            .delete(
                format!("users/{}/tasks/{}", user_id, task_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_reminders(
        &self,
        user_id: ID,
        task_id: ID,
    ) -> APIResponse<get_task_reminders::APIResponse> {
        self.base
            .get(
                format!("users/{}/tasks/{}/reminders", user_id, task_id),
                StatusCode::OK,
            )
            .await
    }
}
