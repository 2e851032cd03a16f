use crate::entities::organiser_entity as organisers;
use crate::models::Owner;
use crate::utils::{decode_gallery, normalize_media_url, normalize_media_urls};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrganiserRequest {
    #[schema(example = "Basement Shows")]
    pub name: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrganiserRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganiserResponse {
    pub id: i64,
    pub name: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    #[schema(value_type = Object)]
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
}

impl OrganiserResponse {
    pub fn from_model(m: organisers::Model, media_base: &str) -> Self {
        let gallery = decode_gallery(&m.gallery);
        Self {
            id: m.id,
            owner: Owner::from_parts(m.owner_type, m.owner_id),
            name: m.name,
            contact_email: m.contact_email,
            website: m.website,
            bio: m.bio,
            image: m
                .image
                .as_deref()
                .and_then(|p| normalize_media_url(media_base, p)),
            gallery: normalize_media_urls(media_base, &gallery),
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
