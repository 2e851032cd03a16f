use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::FeatureService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/paid-features",
    tag = "features",
    responses(
        (status = 200, description = "Purchasable features", body = [PaidFeatureResponse])
    )
)]
pub async fn list_paid_features(
    feature_service: web::Data<FeatureService>,
) -> Result<HttpResponse> {
    match feature_service.catalog().await {
        Ok(features) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": features
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/purchased-features",
    tag = "features",
    params(PurchasedFeatureQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Features bought for the owner", body = [PurchasedFeatureResponse]),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn list_purchased_features(
    feature_service: web::Data<FeatureService>,
    user: CurrentUserId,
    query: web::Query<PurchasedFeatureQuery>,
) -> Result<HttpResponse> {
    let owner = FeatureOwner::from_parts(query.owner_type, query.owner_id);
    match feature_service.list_for_owner(user.0, owner).await {
        Ok(features) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": features
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/purchased-features",
    tag = "features",
    request_body = PurchaseFeatureRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Pending purchase recorded", body = PurchasedFeatureResponse),
        (status = 400, description = "Feature does not apply to this owner", body = ApiErrorResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse),
        (status = 409, description = "Already pending or active", body = ApiErrorResponse)
    )
)]
pub async fn purchase_feature(
    feature_service: web::Data<FeatureService>,
    user: CurrentUserId,
    request: web::Json<PurchaseFeatureRequest>,
) -> Result<HttpResponse> {
    match feature_service.purchase(user.0, request.into_inner()).await {
        Ok(purchased) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": purchased
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/purchased-features/{id}/cancel",
    tag = "features",
    params(("id" = i64, Path, description = "Purchased feature id")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Purchase canceled", body = PurchasedFeatureResponse),
        (status = 400, description = "Already canceled or expired", body = ApiErrorResponse),
        (status = 403, description = "Not the owner", body = ApiErrorResponse)
    )
)]
pub async fn cancel_purchased_feature(
    feature_service: web::Data<FeatureService>,
    user: CurrentUserId,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match feature_service.cancel(user.0, path.into_inner()).await {
        Ok(purchased) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": purchased
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn feature_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/paid-features", web::get().to(list_paid_features))
        .service(
            web::scope("/purchased-features")
                .route("", web::get().to(list_purchased_features))
                .route("", web::post().to(purchase_feature))
                .route("/{id}/cancel", web::post().to(cancel_purchased_feature)),
        );
}
