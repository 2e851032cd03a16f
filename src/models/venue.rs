use crate::entities::venue_entity as venues;
use crate::models::Owner;
use crate::utils::{decode_gallery, normalize_media_url, normalize_media_urls};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateVenueRequest {
    #[schema(example = "The Roundhouse")]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    #[schema(example = 450)]
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VenueQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VenueResponse {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    #[schema(value_type = Object)]
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
}

impl VenueResponse {
    pub fn from_model(m: venues::Model, media_base: &str) -> Self {
        let gallery = decode_gallery(&m.gallery);
        Self {
            id: m.id,
            owner: Owner::from_parts(m.owner_type, m.owner_id),
            name: m.name,
            address: m.address,
            city: m.city,
            capacity: m.capacity,
            description: m.description,
            image: m
                .image
                .as_deref()
                .and_then(|p| normalize_media_url(media_base, p)),
            gallery: normalize_media_urls(media_base, &gallery),
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
