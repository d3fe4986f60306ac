use crate::{
    error::AgendaError,
    shared::{
        auth::protect_user_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::{get_event_reminders, get_task_reminders, RemindersResponse};
use agenda_domain::{OwningItem, Reminder, ID};
use agenda_infra::AgendaContext;

pub async fn get_event_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<get_event_reminders::PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = GetItemRemindersUseCase {
        user_id: user.id,
        item: OwningItem::Event(path_params.event_id),
    };
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(RemindersResponse::new(reminders)))
        .map_err(AgendaError::from)
}

pub async fn get_task_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<get_task_reminders::PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let usecase = GetItemRemindersUseCase {
        user_id: user.id,
        item: OwningItem::Task(path_params.task_id),
    };
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(RemindersResponse::new(reminders)))
        .map_err(AgendaError::from)
}

/// Every `Reminder` the item has had, including the ones already processed
/// and the ones left behind by a deleted item.
#[derive(Debug)]
pub struct GetItemRemindersUseCase {
    pub user_id: ID,
    pub item: OwningItem,
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
impl UseCase for GetItemRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetItemReminders";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_by_item(&self.user_id, &self.item)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
