pub mod admin;
pub mod artist;
pub mod auth;
pub mod event;
pub mod favorite;
pub mod feature;
pub mod notification;
pub mod organiser;
pub mod venue;

pub use admin::admin_config;
pub use artist::artist_config;
pub use auth::auth_config;
pub use event::event_config;
pub use favorite::favorite_config;
pub use feature::feature_config;
pub use notification::notification_config;
pub use organiser::organiser_config;
pub use venue::venue_config;

use crate::error::AppError;
use actix_web::web;

/// Extractor failures are rendered through [`AppError`] like every other error.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    );
}

/// Every route mounted under `/api`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(extractor_config)
        .configure(auth_config)
        .configure(artist_config)
        .configure(organiser_config)
        .configure(venue_config)
        .configure(event_config)
        .configure(favorite_config)
        .configure(feature_config)
        .configure(notification_config)
        .configure(admin_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AuthService, VenueService};
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test};
    use sea_orm::DatabaseConnection;

    async fn call(req: test::TestRequest) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(VenueService::new(
                    DatabaseConnection::Disconnected,
                    "http://localhost:8080".to_string(),
                )))
                .app_data(web::Data::new(AuthService::new(
                    DatabaseConnection::Disconnected,
                    JwtService::new("test-secret", 60, 120),
                )))
                .service(web::scope("/api").configure(api_config)),
        )
        .await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_bad_query_uses_error_envelope() {
        let (status, body) = call(test::TestRequest::get().uri("/api/venue?page=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some());
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_bad_path_uses_error_envelope() {
        let (status, body) = call(test::TestRequest::get().uri("/api/venue/notanumber")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_envelope() {
        let (status, body) = call(
            test::TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some());
    }
}
