use crate::{
    error::AgendaError,
    shared::{
        auth::protect_user_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::get_task::*;
use agenda_domain::{Task, ID};
use agenda_infra::AgendaContext;

pub async fn get_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = GetTaskUseCase {
        user_id: user.id,
        task_id: path_params.task_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct GetTaskUseCase {
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
impl UseCase for GetTaskUseCase {
    type Response = Task;
    type Error = UseCaseError;

    const NAME: &'static str = "GetTask";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let task = ctx
            .repos
            .tasks
            .find(&self.task_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        match task {
            Some(task) if task.user_id == self.user_id => Ok(task),
            _ => Err(UseCaseError::NotFound(self.task_id)),
        }
    }
}
