use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::OrganiserService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/organisers",
    tag = "organisers",
    request_body = CreateOrganiserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Organiser profile created", body = OrganiserResponse),
        (status = 403, description = "Account is not an organiser", body = ApiErrorResponse),
        (status = 409, description = "Profile already exists", body = ApiErrorResponse)
    )
)]
pub async fn create_organiser(
    organiser_service: web::Data<OrganiserService>,
    user: CurrentUserId,
    request: web::Json<CreateOrganiserRequest>,
) -> Result<HttpResponse> {
    match organiser_service.create(user.0, request.into_inner()).await {
        Ok(organiser) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": organiser
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/organisers/{id}",
    tag = "organisers",
    params(("id" = i64, Path, description = "Organiser id")),
    responses(
        (status = 200, description = "Organiser", body = OrganiserResponse),
        (status = 404, description = "No such organiser", body = ApiErrorResponse)
    )
)]
pub async fn get_organiser(
    organiser_service: web::Data<OrganiserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match organiser_service.get(path.into_inner()).await {
        Ok(organiser) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": organiser
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/organisers/{id}",
    tag = "organisers",
    params(("id" = i64, Path, description = "Organiser id")),
    request_body = UpdateOrganiserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Organiser updated", body = OrganiserResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such organiser", body = ApiErrorResponse)
    )
)]
pub async fn update_organiser(
    organiser_service: web::Data<OrganiserService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    request: web::Json<UpdateOrganiserRequest>,
) -> Result<HttpResponse> {
    match organiser_service
        .update(user.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(organiser) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": organiser
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn organiser_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/organisers")
            .route("", web::post().to(create_organiser))
            .route("/{id}", web::get().to(get_organiser))
            .route("/{id}", web::put().to(update_organiser)),
    );
}
