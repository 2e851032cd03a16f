use super::FeatureOwnerType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "paid_features")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    /// `None` means the feature can be bought for any owner type.
    pub applies_to: Option<FeatureOwnerType>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchased_features::Entity")]
    PurchasedFeatures,
}

impl Related<super::purchased_features::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchasedFeatures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
