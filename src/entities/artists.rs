use super::AccountOwnerType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub hometown: Option<String>,
    pub image: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub gallery: Json,
    pub owner_type: AccountOwnerType,
    pub owner_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event_artists::Entity")]
    EventArtists,
}

impl Related<super::event_artists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventArtists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
