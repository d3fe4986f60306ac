use crate::{
    error::AgendaError,
    shared::{
        auth::protect_user_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::get_events::*;
use agenda_domain::{CalendarEvent, ID};
use agenda_infra::AgendaContext;

pub async fn get_events_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = GetEventsUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct GetEventsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventsUseCase {
    type Response = Vec<CalendarEvent>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetEvents";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
