use crate::{
    error::AgendaError,
    shared::{
        auth::protect_user_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::toggle_task::*;
use agenda_domain::{Task, ID};
use agenda_infra::AgendaContext;

pub async fn toggle_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = ToggleTaskUseCase {
        user_id: user.id,
        task_id: path_params.task_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(AgendaError::from)
}

/// Flips the status of the `Task` between pending and completed.
/// The `Reminder` of the `Task` is left as it is.
#[derive(Debug)]
pub struct ToggleTaskUseCase {
    pub user_id: ID,
    pub task_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ToggleTaskUseCase {
    type Response = Task;
    type Error = UseCaseError;

    const NAME: &'static str = "ToggleTask";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let mut task = match ctx
            .repos
            .tasks
            .find(&self.task_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
        {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::NotFound(self.task_id)),
        };

        task.toggle_status();
        task.updated = ctx.sys.now();
        ctx.repos
            .tasks
            .save(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(task)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use agenda_domain::{OwningItem, Reminder, TaskStatus};
    use chrono::{Duration, Utc};

    #[actix_web::main]
    #[test]
    async fn toggles_status_and_keeps_reminder() {
        let ctx = AgendaContext::create_inmemory();
        let now = Utc::now();
        let task = Task {
            id: Default::default(),
            user_id: Default::default(),
            description: "Buy milk".into(),
            due_date: Some((now + Duration::days(2)).date_naive()),
            priority: Default::default(),
            status: Default::default(),
            created: now,
            updated: now,
        };
        ctx.repos.tasks.insert(&task).await.unwrap();
        let reminder = Reminder::new(task.user_id, OwningItem::Task(task.id), now, now);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = ToggleTaskUseCase {
            user_id: task.user_id,
            task_id: task.id,
        };
        let toggled = usecase.execute(&ctx).await.expect("To toggle task");
        assert_eq!(toggled.status, TaskStatus::Completed);
        let toggled = usecase.execute(&ctx).await.expect("To toggle task");
        assert_eq!(toggled.status, TaskStatus::Pending);

        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap(),
            Some(reminder)
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_task() {
        let ctx = AgendaContext::create_inmemory();
        let task_id = ID::default();
        let mut usecase = ToggleTaskUseCase {
            user_id: ID::default(),
            task_id,
        };

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(task_id)
        );
    }
}
