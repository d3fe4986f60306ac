use crate::{
    error::AgendaError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::delete_user::*;
use agenda_domain::{User, ID};
use agenda_infra::AgendaContext;

pub async fn delete_user_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    protect_route(&http_req, &ctx)?;

    let usecase = DeleteUserUseCase {
        user_id: path_params.user_id,
    };
    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(AgendaError::from)
}

/// Deletes the `User` together with its `CalendarEvent`s and `Task`s.
/// `Reminder`s are left behind and end up as errors when dispatched.
#[derive(Debug)]
pub struct DeleteUserUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("A user with id: {}, was not found.", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteUserUseCase {
    type Response = User;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteUser";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .delete(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.user_id))?;

        // Postgres cascades these, the in-memory store does not
        let events = ctx
            .repos
            .events
            .find_by_user(&user.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for e in events {
            ctx.repos
                .events
                .delete(&e.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        let tasks = ctx
            .repos
            .tasks
            .find_by_user(&user.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for task in tasks {
            ctx.repos
                .tasks
                .delete(&task.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(user)
    }
}
