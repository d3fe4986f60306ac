use crate::{APIResponse, BaseClient};
use agenda_api_structs::send_reminders;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Delivers every due reminder now
    pub async fn dispatch(&self) -> APIResponse<send_reminders::APIResponse> {
        self.base
            .post((), "reminders/dispatch".into(), StatusCode::OK)
            .await
    }
}
