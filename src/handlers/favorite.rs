use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::FavoriteService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "favorites",
    params(FavoriteQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "My favorites, newest first", body = [FavoriteResponse]),
        (status = 401, description = "Not logged in", body = ApiErrorResponse)
    )
)]
pub async fn list_favorites(
    favorite_service: web::Data<FavoriteService>,
    user: CurrentUserId,
    query: web::Query<FavoriteQuery>,
) -> Result<HttpResponse> {
    match favorite_service.list(user.0, &query.into_inner()).await {
        Ok(favorites) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": favorites
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/favorites",
    tag = "favorites",
    request_body = FavoriteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Item is favorited", body = FavoriteStatusResponse),
        (status = 404, description = "No such item", body = ApiErrorResponse)
    )
)]
pub async fn add_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: CurrentUserId,
    request: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service.add(user.0, request.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/favorites",
    tag = "favorites",
    params(FavoriteRequest),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Item is not favorited", body = FavoriteStatusResponse)
    )
)]
pub async fn remove_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: CurrentUserId,
    query: web::Query<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service.remove(user.0, query.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/favorites/toggle",
    tag = "favorites",
    request_body = FavoriteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "New favorite state", body = FavoriteStatusResponse),
        (status = 404, description = "No such item", body = ApiErrorResponse)
    )
)]
pub async fn toggle_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: CurrentUserId,
    request: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service.toggle(user.0, request.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/favorites/check",
    tag = "favorites",
    params(FavoriteRequest),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current favorite state", body = FavoriteStatusResponse)
    )
)]
pub async fn check_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: CurrentUserId,
    query: web::Query<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service.is_favorited(user.0, query.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn favorite_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("", web::delete().to(remove_favorite))
            .route("/toggle", web::post().to(toggle_favorite))
            .route("/check", web::get().to(check_favorite)),
    );
}
