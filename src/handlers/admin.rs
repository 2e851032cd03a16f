use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::FeatureService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/admin/purchased-features/{id}/activate",
    tag = "admin",
    params(("id" = i64, Path, description = "Purchased feature id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Feature activated", body = PurchasedFeatureResponse),
        (status = 400, description = "Feature is not pending", body = ApiErrorResponse),
        (status = 403, description = "Admins only", body = ApiErrorResponse)
    )
)]
pub async fn activate_purchased_feature(
    feature_service: web::Data<FeatureService>,
    user: CurrentUserId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match feature_service.activate(user.0, path.into_inner()).await {
        Ok(purchased) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": purchased
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/purchased-features/expire",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Expired features whose period ended", body = ProcessedCount),
        (status = 403, description = "Admins only", body = ApiErrorResponse)
    )
)]
pub async fn expire_purchased_features(
    feature_service: web::Data<FeatureService>,
    user: CurrentUserId,
) -> Result<HttpResponse> {
    match feature_service.expire_now(user.0).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": count
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route(
                "/purchased-features/expire",
                web::post().to(expire_purchased_features),
            )
            .route(
                "/purchased-features/{id}/activate",
                web::post().to(activate_purchased_feature),
            ),
    );
}
