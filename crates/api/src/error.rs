use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use thiserror::Error;

/// Error returned to the clients of the agenda api. The message is sent as
/// the plain text body of the response.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Something went wrong on our side, please try again later")]
    InternalError,
    #[error("The request is invalid: {0}")]
    BadClientData(String),
    #[error("The request conflicts with existing data: {0}")]
    Conflict(String),
    #[error("Not allowed: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for AgendaError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(self.to_string())
    }
}
