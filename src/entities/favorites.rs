use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "favorite_type")]
#[serde(rename_all = "snake_case")]
pub enum FavoriteType {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "venue")]
    Venue,
    #[sea_orm(string_value = "organiser")]
    Organiser,
}

impl std::fmt::Display for FavoriteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoriteType::Artist => write!(f, "artist"),
            FavoriteType::Event => write!(f, "event"),
            FavoriteType::Venue => write!(f, "venue"),
            FavoriteType::Organiser => write!(f, "organiser"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "favorites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub item_type: FavoriteType,
    pub item_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
