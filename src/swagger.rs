use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{EventStatus, FavoriteType, FeatureOwnerType, PurchasedFeatureStatus, UserRole};
use crate::handlers;
use crate::models::*;
use crate::utils::PaginationInfo;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::artist::list_artists,
        handlers::artist::search_artists,
        handlers::artist::get_artist,
        handlers::artist::create_artist,
        handlers::artist::update_artist,
        handlers::artist::upload_artist_gallery,
        handlers::organiser::create_organiser,
        handlers::organiser::get_organiser,
        handlers::organiser::update_organiser,
        handlers::venue::list_venues,
        handlers::venue::get_venue,
        handlers::venue::create_venue,
        handlers::venue::update_venue,
        handlers::venue::upload_venue_gallery,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::create_event,
        handlers::event::update_event,
        handlers::event::cancel_event,
        handlers::event::upload_event_poster,
        handlers::event::get_lineup,
        handlers::event::add_lineup_artist,
        handlers::event::remove_lineup_artist,
        handlers::favorite::list_favorites,
        handlers::favorite::add_favorite,
        handlers::favorite::remove_favorite,
        handlers::favorite::toggle_favorite,
        handlers::favorite::check_favorite,
        handlers::feature::list_paid_features,
        handlers::feature::list_purchased_features,
        handlers::feature::purchase_feature,
        handlers::feature::cancel_purchased_feature,
        handlers::notification::list_notifications,
        handlers::notification::unread_count,
        handlers::notification::mark_read,
        handlers::notification::mark_all_read,
        handlers::admin::activate_purchased_feature,
        handlers::admin::expire_purchased_features,
    ),
    components(
        schemas(
            UserRole,
            SignupRole,
            CreateUserRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            CreateArtistRequest,
            UpdateArtistRequest,
            ArtistResponse,
            CreateOrganiserRequest,
            UpdateOrganiserRequest,
            OrganiserResponse,
            CreateVenueRequest,
            UpdateVenueRequest,
            VenueResponse,
            EventStatus,
            CreateEventRequest,
            UpdateEventRequest,
            AddLineupArtistRequest,
            EventResponse,
            FavoriteType,
            FavoriteRequest,
            FavoriteResponse,
            FavoriteStatusResponse,
            FeatureOwnerType,
            PurchasedFeatureStatus,
            PaidFeatureResponse,
            PurchaseFeatureRequest,
            PurchasedFeatureResponse,
            NotificationResponse,
            UnreadCountResponse,
            ProcessedCount,
            PaginationInfo,
            ApiErrorResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Accounts and tokens"),
        (name = "artists", description = "Artist profiles"),
        (name = "organisers", description = "Organiser profiles"),
        (name = "venues", description = "Venues"),
        (name = "events", description = "Events and lineups"),
        (name = "favorites", description = "Per-user favorites"),
        (name = "features", description = "Paid feature catalog and purchases"),
        (name = "notifications", description = "In-app notifications"),
        (name = "admin", description = "Administrative operations"),
    ),
    info(
        title = "Stagehand Backend API",
        version = "1.0.0",
        description = "Venue, artist and event directory REST API"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_directory_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/venue/createVenue",
            "/api/events/create_event",
            "/api/favorites/toggle",
            "/api/purchased-features",
            "/api/admin/purchased-features/{id}/activate",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
