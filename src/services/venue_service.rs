use crate::entities::venue_entity as venues;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access::{ensure_owner, load_principal};
use crate::utils::*;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct VenueService {
    pool: DatabaseConnection,
    media_base: String,
}

fn validate_capacity(capacity: Option<i32>) -> AppResult<Option<i32>> {
    match capacity {
        Some(c) if c < 0 => Err(AppError::ValidationError(
            "Capacity cannot be negative".to_string(),
        )),
        other => Ok(other),
    }
}

impl VenueService {
    pub fn new(pool: DatabaseConnection, media_base: String) -> Self {
        Self { pool, media_base }
    }

    pub async fn list(&self, query: &VenueQuery) -> AppResult<PaginatedResponse<VenueResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = venues::Entity::find().order_by_asc(venues::Column::Name);
        if let Some(city) = optional_text(query.city.clone()) {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(venues::Column::City))).eq(city.to_lowercase()),
            );
        }

        let paginator = select.paginate(&self.pool, params.page_size());
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(|m| VenueResponse::from_model(m, &self.media_base))
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get(&self, id: i64) -> AppResult<VenueResponse> {
        let venue = self.find(id).await?;
        Ok(VenueResponse::from_model(venue, &self.media_base))
    }

    pub async fn create(&self, user_id: i64, req: CreateVenueRequest) -> AppResult<VenueResponse> {
        let principal = load_principal(&self.pool, user_id).await?;
        let name = require_text("Name", &req.name, 255)?;
        let capacity = validate_capacity(req.capacity)?;
        let (owner_type, owner_id) = principal.default_owner().into_parts();

        let venue = venues::ActiveModel {
            name: Set(name),
            address: Set(optional_text(req.address)),
            city: Set(optional_text(req.city)),
            capacity: Set(capacity),
            description: Set(optional_text(req.description)),
            image: Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u))),
            gallery: Set(encode_gallery(&[])),
            owner_type: Set(owner_type),
            owner_id: Set(owner_id),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("User {user_id} created venue {} owned by {owner_type} {owner_id}", venue.id);
        Ok(VenueResponse::from_model(venue, &self.media_base))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        req: UpdateVenueRequest,
    ) -> AppResult<VenueResponse> {
        let venue = self.find_owned(user_id, id).await?;

        let mut am = venue.into_active_model();
        if let Some(name) = &req.name {
            am.name = Set(require_text("Name", name, 255)?);
        }
        if req.address.is_some() {
            am.address = Set(optional_text(req.address));
        }
        if req.city.is_some() {
            am.city = Set(optional_text(req.city));
        }
        if req.capacity.is_some() {
            am.capacity = Set(validate_capacity(req.capacity)?);
        }
        if req.description.is_some() {
            am.description = Set(optional_text(req.description));
        }
        if req.image.is_some() {
            am.image = Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u)));
        }
        if let Some(gallery) = &req.gallery {
            am.gallery = Set(encode_gallery(&strip_media_bases(&self.media_base, gallery)));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(VenueResponse::from_model(updated, &self.media_base))
    }

    pub async fn append_gallery(
        &self,
        user_id: i64,
        id: i64,
        paths: Vec<String>,
    ) -> AppResult<VenueResponse> {
        let txn = self.pool.begin().await?;
        let venue = venues::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))?;
        let principal = load_principal(&txn, user_id).await?;
        ensure_owner(&principal, Owner::from_parts(venue.owner_type, venue.owner_id))?;

        let mut gallery = decode_gallery(&venue.gallery);
        gallery.extend(paths);
        let mut am = venue.into_active_model();
        am.gallery = Set(encode_gallery(&gallery));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        Ok(VenueResponse::from_model(updated, &self.media_base))
    }

    pub async fn find_owned(&self, user_id: i64, id: i64) -> AppResult<venues::Model> {
        let venue = self.find(id).await?;
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_owner(&principal, Owner::from_parts(venue.owner_type, venue.owner_id))?;
        Ok(venue)
    }

    async fn find(&self, id: i64) -> AppResult<venues::Model> {
        venues::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountOwnerType, UserRole, user_entity as users};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn venue(gallery: serde_json::Value) -> venues::Model {
        venues::Model {
            id: 2,
            name: "Corner Hall".to_string(),
            address: None,
            city: Some("Leeds".to_string()),
            capacity: Some(300),
            description: None,
            image: None,
            gallery,
            owner_type: AccountOwnerType::User,
            owner_id: 7,
            created_at: None,
            updated_at: None,
        }
    }

    fn owner() -> users::Model {
        users::Model {
            id: 7,
            email: "hall@example.com".to_string(),
            username: "hall".to_string(),
            password_hash: "x".to_string(),
            role: UserRole::User,
            artist_id: None,
            organiser_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_append_gallery_extends_locked_row() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![venue(serde_json::json!(["uploads/venues/a.png"]))]])
            .append_query_results([vec![owner()]])
            .append_query_results([vec![venue(serde_json::json!([
                "uploads/venues/a.png",
                "uploads/venues/b.png"
            ]))]])
            .into_connection();
        let svc = VenueService::new(pool.clone(), "http://localhost:8080".to_string());

        let updated = svc
            .append_gallery(7, 2, vec!["uploads/venues/b.png".to_string()])
            .await
            .unwrap();
        assert_eq!(
            updated.gallery,
            vec![
                "http://localhost:8080/uploads/venues/a.png".to_string(),
                "http://localhost:8080/uploads/venues/b.png".to_string(),
            ]
        );

        let log = pool.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = format!("{:?}", log[0]);
        assert!(statements.contains("FOR UPDATE"));
        assert!(statements.contains("uploads/venues/a.png"));
    }

    #[test]
    fn test_validate_capacity() {
        assert_eq!(validate_capacity(None).unwrap(), None);
        assert_eq!(validate_capacity(Some(0)).unwrap(), Some(0));
        assert!(validate_capacity(Some(-1)).is_err());
    }
}
