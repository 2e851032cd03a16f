use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::{MediaKind, MediaService, VenueService};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/venue",
    tag = "venues",
    params(VenueQuery),
    responses(
        (status = 200, description = "Paginated venues", body = [VenueResponse])
    )
)]
pub async fn list_venues(
    venue_service: web::Data<VenueService>,
    query: web::Query<VenueQuery>,
) -> Result<HttpResponse> {
    match venue_service.list(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/venue/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue", body = VenueResponse),
        (status = 404, description = "No such venue", body = ApiErrorResponse)
    )
)]
pub async fn get_venue(
    venue_service: web::Data<VenueService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match venue_service.get(path.into_inner()).await {
        Ok(venue) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": venue
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/venue/createVenue",
    tag = "venues",
    request_body = CreateVenueRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Venue created", body = VenueResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse)
    )
)]
pub async fn create_venue(
    venue_service: web::Data<VenueService>,
    user: CurrentUserId,
    request: web::Json<CreateVenueRequest>,
) -> Result<HttpResponse> {
    match venue_service.create(user.0, request.into_inner()).await {
        Ok(venue) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": venue
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/venue/updateVenue/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    request_body = UpdateVenueRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Venue updated", body = VenueResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such venue", body = ApiErrorResponse)
    )
)]
pub async fn update_venue(
    venue_service: web::Data<VenueService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    request: web::Json<UpdateVenueRequest>,
) -> Result<HttpResponse> {
    match venue_service
        .update(user.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(venue) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": venue
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/venue/uploadGallery/{id}",
    tag = "venues",
    params(("id" = i64, Path, description = "Venue id")),
    request_body(content = String, content_type = "multipart/form-data", description = "One or more image files"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Images appended to the gallery", body = VenueResponse),
        (status = 400, description = "Unsupported or oversized file", body = ApiErrorResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn upload_venue_gallery(
    venue_service: web::Data<VenueService>,
    media_service: web::Data<MediaService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(e) = venue_service.find_owned(user.0, id).await {
        return Ok(e.error_response());
    }

    let stored = match media_service.save_images(payload, MediaKind::Venue).await {
        Ok(stored) => stored,
        Err(e) => return Ok(e.error_response()),
    };

    match venue_service.append_gallery(user.0, id, stored.clone()).await {
        Ok(venue) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": venue
        }))),
        Err(e) => {
            media_service.discard(&stored).await;
            Ok(e.error_response())
        }
    }
}

pub fn venue_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venue")
            .route("", web::get().to(list_venues))
            .route("/createVenue", web::post().to(create_venue))
            .route("/updateVenue/{id}", web::put().to(update_venue))
            .route("/uploadGallery/{id}", web::post().to(upload_venue_gallery))
            .route("/{id}", web::get().to(get_venue)),
    );
}
