use crate::entities::{
    FeatureOwnerType, PurchasedFeatureStatus, paid_feature_entity as paid_features,
    purchased_feature_entity as purchased_features,
};
use crate::models::FeatureOwner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaidFeatureResponse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    pub applies_to: Option<FeatureOwnerType>,
}

impl From<paid_features::Model> for PaidFeatureResponse {
    fn from(m: paid_features::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            name: m.name,
            description: m.description,
            price_cents: m.price_cents,
            duration_days: m.duration_days,
            applies_to: m.applies_to,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseFeatureRequest {
    #[schema(value_type = Object, example = json!({"type": "venue", "id": 1}))]
    pub owner: FeatureOwner,
    pub feature_id: i64,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchasedFeatureQuery {
    pub owner_type: FeatureOwnerType,
    pub owner_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchasedFeatureResponse {
    pub id: i64,
    #[schema(value_type = Object)]
    pub owner: FeatureOwner,
    pub feature_id: i64,
    pub status: PurchasedFeatureStatus,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub price_paid: i64,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<purchased_features::Model> for PurchasedFeatureResponse {
    fn from(m: purchased_features::Model) -> Self {
        Self {
            id: m.id,
            owner: FeatureOwner::from_parts(m.owner_type, m.owner_id),
            feature_id: m.feature_id,
            status: m.status,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            price_paid: m.price_paid,
            metadata: m.metadata,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
