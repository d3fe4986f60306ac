use crate::{error::AgendaError, shared::auth::protect_user_route};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::get_user::*;
use agenda_infra::AgendaContext;

pub async fn get_user_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(user)))
}
