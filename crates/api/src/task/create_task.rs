use crate::error::AgendaError;
use crate::reminder::sync_reminder;
use crate::shared::{
    auth::protect_user_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::create_task::*;
use agenda_domain::{NaiveDate, Task, TaskPriority, TaskStatus, User};
use agenda_infra::AgendaContext;
use tracing::error;

pub async fn create_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let body = body.0;
    let usecase = CreateTaskUseCase {
        user,
        description: body.description,
        due_date: body.due_date,
        priority: body.priority.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Created().json(APIResponse::new(task)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct CreateTaskUseCase {
    pub user: User,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyDescription,
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyDescription => {
                Self::BadClientData("The task description is required.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTaskUseCase {
    type Response = Task;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateTask";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(UseCaseError::EmptyDescription);
        }

        let now = ctx.sys.now();
        let task = Task {
            id: Default::default(),
            user_id: self.user.id,
            description: description.to_string(),
            due_date: self.due_date,
            priority: self.priority,
            status: TaskStatus::Pending,
            created: now,
            updated: now,
        };

        let mut uow = ctx
            .repos
            .units_of_work
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        uow.insert_task(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if let Err(err) = sync_reminder(uow.as_mut(), &task, now).await {
            error!("Task {} is saved without a reminder: {}", task.id, err);
        }
        uow.commit().await.map_err(|_| UseCaseError::StorageError)?;

        Ok(task)
    }
}
