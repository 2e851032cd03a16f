use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::{ArtistService, MediaKind, MediaService};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/artists",
    tag = "artists",
    params(ArtistQuery),
    responses(
        (status = 200, description = "Paginated artists", body = [ArtistResponse])
    )
)]
pub async fn list_artists(
    artist_service: web::Data<ArtistService>,
    query: web::Query<ArtistQuery>,
) -> Result<HttpResponse> {
    match artist_service.list(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/artists/search",
    tag = "artists",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching artists", body = [ArtistResponse])
    )
)]
pub async fn search_artists(
    artist_service: web::Data<ArtistService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    match artist_service.search(&query.into_inner()).await {
        Ok(artists) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artists
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/artists/{id}",
    tag = "artists",
    params(("id" = i64, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist", body = ArtistResponse),
        (status = 404, description = "No such artist", body = ApiErrorResponse)
    )
)]
pub async fn get_artist(
    artist_service: web::Data<ArtistService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match artist_service.get(path.into_inner()).await {
        Ok(artist) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artist
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/artists",
    tag = "artists",
    request_body = CreateArtistRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Artist profile created", body = ArtistResponse),
        (status = 403, description = "Account is not an artist", body = ApiErrorResponse),
        (status = 409, description = "Profile already exists", body = ApiErrorResponse)
    )
)]
pub async fn create_artist(
    artist_service: web::Data<ArtistService>,
    user: CurrentUserId,
    request: web::Json<CreateArtistRequest>,
) -> Result<HttpResponse> {
    match artist_service.create(user.0, request.into_inner()).await {
        Ok(artist) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": artist
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/artists/{id}",
    tag = "artists",
    params(("id" = i64, Path, description = "Artist id")),
    request_body = UpdateArtistRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Artist updated", body = ArtistResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 404, description = "No such artist", body = ApiErrorResponse)
    )
)]
pub async fn update_artist(
    artist_service: web::Data<ArtistService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    request: web::Json<UpdateArtistRequest>,
) -> Result<HttpResponse> {
    match artist_service
        .update(user.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(artist) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artist
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/artists/{id}/gallery",
    tag = "artists",
    params(("id" = i64, Path, description = "Artist id")),
    request_body(content = String, content_type = "multipart/form-data", description = "One or more image files"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Images appended to the gallery", body = ArtistResponse),
        (status = 400, description = "Unsupported or oversized file", body = ApiErrorResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn upload_artist_gallery(
    artist_service: web::Data<ArtistService>,
    media_service: web::Data<MediaService>,
    user: CurrentUserId,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(e) = artist_service.find_owned(user.0, id).await {
        return Ok(e.error_response());
    }

    let stored = match media_service.save_images(payload, MediaKind::Artist).await {
        Ok(stored) => stored,
        Err(e) => return Ok(e.error_response()),
    };

    match artist_service.append_gallery(user.0, id, stored.clone()).await {
        Ok(artist) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": artist
        }))),
        Err(e) => {
            media_service.discard(&stored).await;
            Ok(e.error_response())
        }
    }
}

pub fn artist_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/artists")
            .route("", web::get().to(list_artists))
            .route("", web::post().to(create_artist))
            .route("/search", web::get().to(search_artists))
            .route("/{id}", web::get().to(get_artist))
            .route("/{id}", web::put().to(update_artist))
            .route("/{id}/gallery", web::post().to(upload_artist_gallery)),
    );
}
