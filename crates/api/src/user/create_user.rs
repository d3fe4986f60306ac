use crate::shared::usecase::{execute, UseCase};
use crate::{error::AgendaError, shared::auth::protect_route};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::create_user::*;
use agenda_domain::User;
use agenda_infra::AgendaContext;

pub async fn create_user_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateUserUseCase {
        username: body.username,
        email: body.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|usecase_res| HttpResponse::Created().json(APIResponse::new(usecase_res.user)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub user: User,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyUsername,
    StorageError,
    UsernameTaken,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyUsername => Self::BadClientData("The username is required.".into()),
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::UsernameTaken => Self::Conflict(
                "A user with that username already exist. Usernames need to be unique.".into(),
            ),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UseCaseError::EmptyUsername);
        }
        let email = self
            .email
            .as_ref()
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        let existing = ctx
            .repos
            .users
            .find_by_username(username)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if existing.is_some() {
            return Err(UseCaseError::UsernameTaken);
        }

        let user = User::new(username.to_string(), email, ctx.sys.now());
        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { user })
    }
}
