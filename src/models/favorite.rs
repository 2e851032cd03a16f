use crate::entities::{FavoriteType, favorite_entity as favorites};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Identifies the favorited item; `itemId` is accepted for web clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FavoriteRequest {
    #[serde(rename = "type")]
    pub item_type: FavoriteType,
    #[serde(alias = "itemId")]
    pub item_id: i64,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FavoriteQuery {
    #[serde(rename = "type")]
    pub item_type: Option<FavoriteType>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: FavoriteType,
    pub item_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteStatusResponse {
    #[serde(rename = "type")]
    pub item_type: FavoriteType,
    pub item_id: i64,
    pub favorited: bool,
}

impl From<favorites::Model> for FavoriteResponse {
    fn from(m: favorites::Model) -> Self {
        Self {
            id: m.id,
            item_type: m.item_type,
            item_id: m.item_id,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_request_accepts_camel_case_item_id() {
        let req: FavoriteRequest =
            serde_json::from_str(r#"{"type":"venue","itemId":12}"#).unwrap();
        assert_eq!(req.item_type, FavoriteType::Venue);
        assert_eq!(req.item_id, 12);

        let req: FavoriteRequest =
            serde_json::from_str(r#"{"type":"organiser","item_id":3}"#).unwrap();
        assert_eq!(req.item_type, FavoriteType::Organiser);
    }

    #[test]
    fn test_favorite_request_rejects_unknown_type() {
        assert!(serde_json::from_str::<FavoriteRequest>(r#"{"type":"user","itemId":1}"#).is_err());
    }
}
