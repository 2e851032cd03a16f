use super::FeatureOwnerType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "purchased_feature_status"
)]
#[serde(rename_all = "snake_case")]
pub enum PurchasedFeatureStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl std::fmt::Display for PurchasedFeatureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchasedFeatureStatus::Pending => write!(f, "pending"),
            PurchasedFeatureStatus::Active => write!(f, "active"),
            PurchasedFeatureStatus::Canceled => write!(f, "canceled"),
            PurchasedFeatureStatus::Expired => write!(f, "expired"),
        }
    }
}

impl PurchasedFeatureStatus {
    /// pending -> active -> (expired | canceled), plus pending -> canceled.
    pub fn can_transition_to(self, next: PurchasedFeatureStatus) -> bool {
        use PurchasedFeatureStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Canceled) | (Active, Expired) | (Active, Canceled)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "purchased_features")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_type: FeatureOwnerType,
    pub owner_id: i64,
    pub feature_id: i64,
    pub status: PurchasedFeatureStatus,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub price_paid: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::paid_features::Entity",
        from = "Column::FeatureId",
        to = "super::paid_features::Column::Id"
    )]
    PaidFeature,
}

impl Related<super::paid_features::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaidFeature.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PurchasedFeatureStatus::*;

    #[test]
    fn test_lifecycle_transitions() {
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Canceled));
        assert!(Active.can_transition_to(Expired));
        assert!(Active.can_transition_to(Canceled));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Pending.can_transition_to(Expired));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Pending));
        assert!(!Expired.can_transition_to(Active));
        assert!(!Canceled.can_transition_to(Active));
        assert!(!Canceled.can_transition_to(Expired));
    }
}
