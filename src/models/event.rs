use crate::entities::{EventStatus, event_entity as events};
use crate::models::{ArtistResponse, Owner};
use crate::utils::{decode_gallery, normalize_media_url, normalize_media_urls};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Friday Late Show")]
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub venue_id: Option<i64>,
    pub poster: Option<String>,
    pub ticket_url: Option<String>,
    pub price_cents: Option<i64>,
    /// Initial lineup.
    #[serde(default)]
    pub artist_ids: Vec<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub venue_id: Option<i64>,
    pub poster: Option<String>,
    pub ticket_url: Option<String>,
    pub price_cents: Option<i64>,
    pub gallery: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub venue_id: Option<i64>,
    /// Only events starting from now on.
    pub upcoming: Option<bool>,
    pub include_canceled: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddLineupArtistRequest {
    pub artist_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub venue_id: Option<i64>,
    pub poster: Option<String>,
    pub gallery: Vec<String>,
    pub ticket_url: Option<String>,
    pub price_cents: Option<i64>,
    pub status: EventStatus,
    #[schema(value_type = Object)]
    pub owner: Owner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<ArtistResponse>>,
    pub created_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn from_model(m: events::Model, media_base: &str) -> Self {
        let gallery = decode_gallery(&m.gallery);
        Self {
            id: m.id,
            owner: Owner::from_parts(m.owner_type, m.owner_id),
            title: m.title,
            description: m.description,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            venue_id: m.venue_id,
            poster: m
                .poster
                .as_deref()
                .and_then(|p| normalize_media_url(media_base, p)),
            gallery: normalize_media_urls(media_base, &gallery),
            ticket_url: m.ticket_url,
            price_cents: m.price_cents,
            status: m.status,
            artists: None,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }

    pub fn with_artists(mut self, artists: Vec<ArtistResponse>) -> Self {
        self.artists = Some(artists);
        self
    }
}
