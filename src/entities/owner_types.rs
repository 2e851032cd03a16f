use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account that controls an artist, organiser, venue or event row.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_owner_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountOwnerType {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "organiser")]
    Organiser,
    #[sea_orm(string_value = "user")]
    User,
}

impl std::fmt::Display for AccountOwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountOwnerType::Artist => write!(f, "artist"),
            AccountOwnerType::Organiser => write!(f, "organiser"),
            AccountOwnerType::User => write!(f, "user"),
        }
    }
}

/// Entity a purchased feature is attached to.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "feature_owner_type")]
#[serde(rename_all = "snake_case")]
pub enum FeatureOwnerType {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "venue")]
    Venue,
    #[sea_orm(string_value = "event")]
    Event,
}

impl std::fmt::Display for FeatureOwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureOwnerType::Artist => write!(f, "artist"),
            FeatureOwnerType::Venue => write!(f, "venue"),
            FeatureOwnerType::Event => write!(f, "event"),
        }
    }
}
