use crate::entities::artist_entity as artists;
use crate::models::Owner;
use crate::utils::{decode_gallery, normalize_media_url, normalize_media_urls};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateArtistRequest {
    #[schema(example = "The Night Owls")]
    pub name: String,
    #[schema(example = "indie")]
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub hometown: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub hometown: Option<String>,
    pub image: Option<String>,
    /// Replaces the whole gallery, e.g. after reordering or removing images.
    pub gallery: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArtistQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched case-insensitively against name, genre and hometown.
    pub q: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArtistResponse {
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub hometown: Option<String>,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    #[schema(value_type = Object)]
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
}

impl ArtistResponse {
    pub fn from_model(m: artists::Model, media_base: &str) -> Self {
        let gallery = decode_gallery(&m.gallery);
        Self {
            id: m.id,
            owner: Owner::from_parts(m.owner_type, m.owner_id),
            name: m.name,
            genre: m.genre,
            bio: m.bio,
            hometown: m.hometown,
            image: m
                .image
                .as_deref()
                .and_then(|p| normalize_media_url(media_base, p)),
            gallery: normalize_media_urls(media_base, &gallery),
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
