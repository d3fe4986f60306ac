use crate::error::AgendaError;
use actix_web::HttpRequest;
use agenda_domain::{User, ID};
use agenda_infra::AgendaContext;
use tracing::error;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Only requests carrying the configured api key are let through
pub fn protect_route(http_req: &HttpRequest, ctx: &AgendaContext) -> Result<(), AgendaError> {
    let api_key = http_req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match api_key {
        Some(api_key) if api_key == ctx.config.api_key => Ok(()),
        Some(_) => Err(AgendaError::Unauthorized(format!(
            "Invalid api key provided in the `{}` header.",
            API_KEY_HEADER
        ))),
        None => Err(AgendaError::Unauthorized(format!(
            "Missing the `{}` header.",
            API_KEY_HEADER
        ))),
    }
}

/// Finds the `User` a per user route is addressed to
pub async fn protect_user_route(
    http_req: &HttpRequest,
    user_id: &ID,
    ctx: &AgendaContext,
) -> Result<User, AgendaError> {
    protect_route(http_req, ctx)?;

    match ctx.repos.users.find(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AgendaError::NotFound(format!(
            "A user with id: {}, was not found.",
            user_id
        ))),
        Err(e) => {
            error!("Unable to look up user {}: {:?}", user_id, e);
            Err(AgendaError::InternalError)
        }
    }
}
