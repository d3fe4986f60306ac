use crate::{APIResponse, BaseClient, ID};
use agenda_api_structs::*;
use agenda_domain::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct CalendarEventClient {
    base: Arc<BaseClient>,
}

pub struct CreateEventInput {
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub struct UpdateEventInput {
    pub user_id: ID,
    pub event_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CalendarEventClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateEventInput) -> APIResponse<create_event::APIResponse> {
        let body = create_event::RequestBody {
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
        };

        self.base
            .post(
                body,
                format!("users/{}/events", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(&self, user_id: ID, event_id: ID) -> APIResponse<get_event::APIResponse> {
        self.base
            .get(
                format!("users/{}/events/{}", user_id, event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_user(&self, user_id: ID) -> APIResponse<get_events::APIResponse> {
        self.base
            .get(format!("users/{}/events", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateEventInput) -> APIResponse<update_event::APIResponse> {
        let body = update_event::RequestBody {
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
        };

        self.base
            .put(
                body,
                format!("users/{}/events/{}", input.user_id, input.event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, user_id: ID, event_id: ID) -> APIResponse<delete_event::APIResponse> {
        self.base
            .delete(
                format!("users/{}/events/{}", user_id, event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_reminders(
        &self,
        user_id: ID,
        event_id: ID,
    ) -> APIResponse<get_event_reminders::APIResponse> {
        self.base
            .get(
                format!("users/{}/events/{}/reminders", user_id, event_id),
                StatusCode::OK,
            )
            .await
    }
}
