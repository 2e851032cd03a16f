use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    params(NotificationQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "My notifications, newest first", body = [NotificationResponse])
    )
)]
pub async fn list_notifications(
    notification_service: web::Data<NotificationService>,
    user: CurrentUserId,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    match notification_service.list(user.0, &query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountResponse)
    )
)]
pub async fn unread_count(
    notification_service: web::Data<NotificationService>,
    user: CurrentUserId,
) -> Result<HttpResponse> {
    match notification_service.unread_count(user.0).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": count
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = "notifications",
    params(("id" = i64, Path, description = "Notification id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Marked as read", body = NotificationResponse),
        (status = 403, description = "Not the recipient", body = ApiErrorResponse),
        (status = 404, description = "No such notification", body = ApiErrorResponse)
    )
)]
pub async fn mark_read(
    notification_service: web::Data<NotificationService>,
    user: CurrentUserId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match notification_service.mark_read(user.0, path.into_inner()).await {
        Ok(notification) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": notification
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Number of notifications marked read", body = ProcessedCount)
    )
)]
pub async fn mark_all_read(
    notification_service: web::Data<NotificationService>,
    user: CurrentUserId,
) -> Result<HttpResponse> {
    match notification_service.mark_all_read(user.0).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": count
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(unread_count))
            .route("/read-all", web::put().to(mark_all_read))
            .route("/{id}/read", web::put().to(mark_read)),
    );
}
