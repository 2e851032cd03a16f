use crate::error::AppError;
use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::{EventService, MediaKind, MediaService};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Paginated events ordered by start time", body = [EventResponse])
    )
)]
pub async fn list_events(
    event_service: web::Data<EventService>,
    query: web::Query<EventQuery>,
) -> Result<HttpResponse> {
    match event_service.list(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event with lineup", body = EventResponse),
        (status = 404, description = "No such event", body = ApiErrorResponse)
    )
)]
pub async fn get_event(
    event_service: web::Data<EventService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.get(path.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/events/create_event",
    tag = "events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid input or unknown venue/artist", body = ApiErrorResponse)
    )
)]
pub async fn create_event(
    event_service: web::Data<EventService>,
    user: CurrentUserId,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    match event_service.create(user.0, request.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such event", body = ApiErrorResponse)
    )
)]
pub async fn update_event(
    event_service: web::Data<EventService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    match event_service
        .update(user.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event canceled", body = EventResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such event", body = ApiErrorResponse)
    )
)]
pub async fn cancel_event(
    event_service: web::Data<EventService>,
    user: CurrentUserId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.cancel(user.0, path.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/poster",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body(content = String, content_type = "multipart/form-data", description = "A single image file"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Poster replaced", body = EventResponse),
        (status = 400, description = "Unsupported or oversized file", body = ApiErrorResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn upload_event_poster(
    event_service: web::Data<EventService>,
    media_service: web::Data<MediaService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(e) = event_service.find_owned(user.0, id).await {
        return Ok(e.error_response());
    }

    let stored = match media_service.save_images(payload, MediaKind::Event).await {
        Ok(stored) => stored,
        Err(e) => return Ok(e.error_response()),
    };
    // only the first file becomes the poster
    let mut files = stored.into_iter();
    let Some(poster) = files.next() else {
        return Ok(AppError::ValidationError("No image files in upload".to_string()).error_response());
    };
    let extra: Vec<String> = files.collect();
    media_service.discard(&extra).await;

    match event_service.set_poster(user.0, id, poster.clone()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => {
            media_service.discard(&[poster]).await;
            Ok(e.error_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/artists",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Lineup", body = [ArtistResponse])
    )
)]
pub async fn get_lineup(
    event_service: web::Data<EventService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.lineup(path.into_inner()).await {
        Ok(artists) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artists
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/artists",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = AddLineupArtistRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Updated lineup", body = [ArtistResponse]),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such event or artist", body = ApiErrorResponse)
    )
)]
pub async fn add_lineup_artist(
    event_service: web::Data<EventService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    request: web::Json<AddLineupArtistRequest>,
) -> Result<HttpResponse> {
    match event_service
        .add_artist(user.0, path.into_inner(), request.artist_id)
        .await
    {
        Ok(artists) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artists
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}/artists/{artist_id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event id"),
        ("artist_id" = i64, Path, description = "Artist id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Updated lineup", body = [ArtistResponse]),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn remove_lineup_artist(
    event_service: web::Data<EventService>,
    user: CurrentUserId,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (id, artist_id) = path.into_inner();
    match event_service.remove_artist(user.0, id, artist_id).await {
        Ok(artists) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artists
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(list_events))
            .route("/create_event", web::post().to(create_event))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::put().to(update_event))
            .route("/{id}", web::delete().to(cancel_event))
            .route("/{id}/poster", web::post().to(upload_event_poster))
            .route("/{id}/artists", web::get().to(get_lineup))
            .route("/{id}/artists", web::post().to(add_lineup_artist))
            .route(
                "/{id}/artists/{artist_id}",
                web::delete().to(remove_lineup_artist),
            ),
    );
}
