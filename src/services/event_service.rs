use crate::entities::{
    EventStatus, artist_entity as artists, event_artist_entity as event_artists,
    event_entity as events, venue_entity as venues,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::NotificationService;
use crate::services::access::{ensure_owner, load_principal};
use crate::utils::*;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
    media_base: String,
    notifications: NotificationService,
}

fn validate_schedule(starts_at: DateTime<Utc>, ends_at: Option<DateTime<Utc>>) -> AppResult<()> {
    if let Some(ends_at) = ends_at
        && ends_at < starts_at
    {
        return Err(AppError::ValidationError(
            "Event cannot end before it starts".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price_cents: Option<i64>) -> AppResult<Option<i64>> {
    match price_cents {
        Some(p) if p < 0 => Err(AppError::ValidationError(
            "Price cannot be negative".to_string(),
        )),
        other => Ok(other),
    }
}

fn dedup_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl EventService {
    pub fn new(
        pool: DatabaseConnection,
        media_base: String,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            media_base,
            notifications,
        }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<PaginatedResponse<EventResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = events::Entity::find()
            .order_by_asc(events::Column::StartsAt)
            .order_by_asc(events::Column::Id);
        if !query.include_canceled.unwrap_or(false) {
            select = select.filter(events::Column::Status.ne(EventStatus::Canceled));
        }
        if let Some(venue_id) = query.venue_id {
            select = select.filter(events::Column::VenueId.eq(venue_id));
        }
        if query.upcoming.unwrap_or(false) {
            select = select.filter(events::Column::StartsAt.gte(Utc::now()));
        }

        let paginator = select.paginate(&self.pool, params.page_size());
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(|m| EventResponse::from_model(m, &self.media_base))
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// Single event with its lineup.
    pub async fn get(&self, id: i64) -> AppResult<EventResponse> {
        let event = self.find(id).await?;
        let lineup = self.lineup(id).await?;
        Ok(EventResponse::from_model(event, &self.media_base).with_artists(lineup))
    }

    pub async fn create(&self, user_id: i64, req: CreateEventRequest) -> AppResult<EventResponse> {
        let principal = load_principal(&self.pool, user_id).await?;
        let title = require_text("Title", &req.title, 255)?;
        validate_schedule(req.starts_at, req.ends_at)?;
        let price_cents = validate_price(req.price_cents)?;
        if let Some(venue_id) = req.venue_id {
            self.ensure_venue_exists(venue_id).await?;
        }
        let artist_ids = dedup_ids(req.artist_ids);
        let lineup = self.find_artists(&artist_ids).await?;
        let (owner_type, owner_id) = principal.default_owner().into_parts();

        let txn = self.pool.begin().await?;
        let event = events::ActiveModel {
            title: Set(title),
            description: Set(optional_text(req.description)),
            starts_at: Set(req.starts_at),
            ends_at: Set(req.ends_at),
            venue_id: Set(req.venue_id),
            poster: Set(optional_text(req.poster).map(|u| strip_media_base(&self.media_base, &u))),
            gallery: Set(encode_gallery(&[])),
            ticket_url: Set(optional_text(req.ticket_url)),
            price_cents: Set(price_cents),
            status: Set(EventStatus::Scheduled),
            owner_type: Set(owner_type),
            owner_id: Set(owner_id),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        Self::insert_lineup(&txn, event.id, &artist_ids).await?;
        txn.commit().await?;

        log::info!(
            "User {user_id} created event {} with {} lineup artists",
            event.id,
            artist_ids.len()
        );
        for artist in &lineup {
            self.notify_lineup_added(user_id, &event, artist).await;
        }

        let artists = lineup
            .into_iter()
            .map(|m| ArtistResponse::from_model(m, &self.media_base))
            .collect();
        Ok(EventResponse::from_model(event, &self.media_base).with_artists(artists))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        req: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let event = self.find_owned(user_id, id).await?;

        let starts_at = req.starts_at.unwrap_or(event.starts_at);
        let ends_at = req.ends_at.or(event.ends_at);
        validate_schedule(starts_at, ends_at)?;
        if let Some(venue_id) = req.venue_id {
            self.ensure_venue_exists(venue_id).await?;
        }

        let mut am = event.into_active_model();
        if let Some(title) = &req.title {
            am.title = Set(require_text("Title", title, 255)?);
        }
        if req.description.is_some() {
            am.description = Set(optional_text(req.description));
        }
        if req.starts_at.is_some() {
            am.starts_at = Set(starts_at);
        }
        if req.ends_at.is_some() {
            am.ends_at = Set(ends_at);
        }
        if req.venue_id.is_some() {
            am.venue_id = Set(req.venue_id);
        }
        if req.poster.is_some() {
            am.poster = Set(optional_text(req.poster).map(|u| strip_media_base(&self.media_base, &u)));
        }
        if req.ticket_url.is_some() {
            am.ticket_url = Set(optional_text(req.ticket_url));
        }
        if req.price_cents.is_some() {
            am.price_cents = Set(validate_price(req.price_cents)?);
        }
        if let Some(gallery) = &req.gallery {
            am.gallery = Set(encode_gallery(&strip_media_bases(&self.media_base, gallery)));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        let lineup = self.lineup(id).await?;
        Ok(EventResponse::from_model(updated, &self.media_base).with_artists(lineup))
    }

    /// Events are canceled, never deleted. Canceling twice is a no-op.
    pub async fn cancel(&self, user_id: i64, id: i64) -> AppResult<EventResponse> {
        let event = self.find_owned(user_id, id).await?;
        if event.status == EventStatus::Canceled {
            return Ok(EventResponse::from_model(event, &self.media_base));
        }

        let mut am = event.into_active_model();
        am.status = Set(EventStatus::Canceled);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!("User {user_id} canceled event {id}");
        Ok(EventResponse::from_model(updated, &self.media_base))
    }

    pub async fn set_poster(&self, user_id: i64, id: i64, path: String) -> AppResult<EventResponse> {
        let event = self.find_owned(user_id, id).await?;

        let mut am = event.into_active_model();
        am.poster = Set(Some(path));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(EventResponse::from_model(updated, &self.media_base))
    }

    pub async fn lineup(&self, id: i64) -> AppResult<Vec<ArtistResponse>> {
        let artists = artists::Entity::find()
            .inner_join(event_artists::Entity)
            .filter(event_artists::Column::EventId.eq(id))
            .order_by_asc(artists::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(artists
            .into_iter()
            .map(|m| ArtistResponse::from_model(m, &self.media_base))
            .collect())
    }

    pub async fn add_artist(
        &self,
        user_id: i64,
        id: i64,
        artist_id: i64,
    ) -> AppResult<Vec<ArtistResponse>> {
        let event = self.find_owned(user_id, id).await?;
        let artist = artists::Entity::find_by_id(artist_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

        let already_listed = event_artists::Entity::find_by_id((id, artist_id))
            .one(&self.pool)
            .await?
            .is_some();
        if !already_listed {
            Self::insert_lineup(&self.pool, id, &[artist_id]).await?;
            self.notify_lineup_added(user_id, &event, &artist).await;
        }

        self.lineup(id).await
    }

    pub async fn remove_artist(
        &self,
        user_id: i64,
        id: i64,
        artist_id: i64,
    ) -> AppResult<Vec<ArtistResponse>> {
        self.find_owned(user_id, id).await?;
        event_artists::Entity::delete_many()
            .filter(event_artists::Column::EventId.eq(id))
            .filter(event_artists::Column::ArtistId.eq(artist_id))
            .exec(&self.pool)
            .await?;

        self.lineup(id).await
    }

    pub async fn find_owned(&self, user_id: i64, id: i64) -> AppResult<events::Model> {
        let event = self.find(id).await?;
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_owner(&principal, Owner::from_parts(event.owner_type, event.owner_id))?;
        Ok(event)
    }

    async fn find(&self, id: i64) -> AppResult<events::Model> {
        events::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    async fn ensure_venue_exists(&self, venue_id: i64) -> AppResult<()> {
        let exists = venues::Entity::find_by_id(venue_id)
            .count(&self.pool)
            .await?
            > 0;
        if !exists {
            return Err(AppError::ValidationError(format!(
                "Venue {venue_id} does not exist"
            )));
        }
        Ok(())
    }

    /// All requested artists, or a validation error naming the first unknown id.
    async fn find_artists(&self, ids: &[i64]) -> AppResult<Vec<artists::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = artists::Entity::find()
            .filter(artists::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(artists::Column::Name)
            .all(&self.pool)
            .await?;
        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|a| a.id == **id)) {
            return Err(AppError::ValidationError(format!(
                "Artist {missing} does not exist"
            )));
        }
        Ok(found)
    }

    async fn insert_lineup<C: ConnectionTrait>(
        db: &C,
        event_id: i64,
        artist_ids: &[i64],
    ) -> AppResult<()> {
        if artist_ids.is_empty() {
            return Ok(());
        }
        let rows = artist_ids.iter().map(|artist_id| event_artists::ActiveModel {
            event_id: Set(event_id),
            artist_id: Set(*artist_id),
            created_at: Set(Some(Utc::now())),
        });
        event_artists::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    event_artists::Column::EventId,
                    event_artists::Column::ArtistId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn notify_lineup_added(&self, actor_id: i64, event: &events::Model, artist: &artists::Model) {
        self.notifications
            .notify_owner(
                Owner::from_parts(artist.owner_type, artist.owner_id),
                actor_id,
                "lineup_added",
                format!("{} was added to the lineup of \"{}\"", artist.name, event.title),
                Some(format!("/events/{}", event.id)),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_schedule() {
        let start = Utc::now();
        assert!(validate_schedule(start, None).is_ok());
        assert!(validate_schedule(start, Some(start)).is_ok());
        assert!(validate_schedule(start, Some(start + Duration::hours(3))).is_ok());
        assert!(validate_schedule(start, Some(start - Duration::minutes(1))).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(Some(0)).unwrap(), Some(0));
        assert_eq!(validate_price(None).unwrap(), None);
        assert!(validate_price(Some(-100)).is_err());
    }

    #[test]
    fn test_dedup_ids() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(dedup_ids(Vec::new()).is_empty());
    }
}
