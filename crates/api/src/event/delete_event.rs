use crate::{
    error::AgendaError,
    shared::{
        auth::protect_user_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::delete_event::*;
use agenda_domain::{CalendarEvent, ID};
use agenda_infra::AgendaContext;

pub async fn delete_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = DeleteEventUseCase {
        user_id: user.id,
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(AgendaError::from)
}

/// Deletes the `CalendarEvent`. Its `Reminder`s are kept.
#[derive(Debug)]
pub struct DeleteEventUseCase {
    pub user_id: ID,
    pub event_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The calendar event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteEventUseCase {
    type Response = CalendarEvent;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let e = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        match e {
            Some(event) if event.user_id == self.user_id => {
                ctx.repos
                    .events
                    .delete(&event.id)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(event)
            }
            _ => Err(UseCaseError::NotFound(self.event_id)),
        }
    }
}
