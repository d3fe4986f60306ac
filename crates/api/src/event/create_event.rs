use crate::error::AgendaError;
use crate::reminder::sync_reminder;
use crate::shared::{
    auth::protect_user_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::create_event::*;
use agenda_domain::{CalendarEvent, DateTime, User, Utc};
use agenda_infra::AgendaContext;
use tracing::error;

pub async fn create_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let body = body.0;
    let usecase = CreateEventUseCase {
        user,
        title: body.title,
        description: body.description,
        start_time: body.start_time,
        end_time: body.end_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub user: User,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("The event title is required.".into()),
            UseCaseError::InvalidTimespan => {
                Self::BadClientData("The end time of the event can not be before its start time.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = CalendarEvent;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let now = ctx.sys.now();
        let e = CalendarEvent {
            id: Default::default(),
            user_id: self.user.id,
            title: title.to_string(),
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
            start_time: self.start_time,
            end_time: self.end_time,
            created: now,
            updated: now,
        };
        if !e.has_valid_timespan() {
            return Err(UseCaseError::InvalidTimespan);
        }

        let mut uow = ctx
            .repos
            .units_of_work
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        uow.insert_event(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if let Err(err) = sync_reminder(uow.as_mut(), &e, now).await {
            error!("Event {} is saved without a reminder: {}", e.id, err);
        }
        uow.commit().await.map_err(|_| UseCaseError::StorageError)?;

        Ok(e)
    }
}
