use crate::entities::{AccountOwnerType, UserRole, artist_entity as artists};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access::{ensure_owner, load_principal, lock_user};
use crate::utils::*;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

const MAX_SEARCH_RESULTS: u32 = 50;

/// `%` and `_` are LIKE wildcards and are dropped from user input.
pub(crate) fn like_pattern(term: &str) -> String {
    let cleaned: String = term
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '%' && *c != '_')
        .collect();
    format!("%{cleaned}%")
}

#[derive(Clone)]
pub struct ArtistService {
    pool: DatabaseConnection,
    media_base: String,
}

impl ArtistService {
    pub fn new(pool: DatabaseConnection, media_base: String) -> Self {
        Self { pool, media_base }
    }

    pub async fn list(&self, query: &ArtistQuery) -> AppResult<PaginatedResponse<ArtistResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = artists::Entity::find().order_by_asc(artists::Column::Name);
        if let Some(genre) = optional_text(query.genre.clone()) {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(artists::Column::Genre)))
                    .eq(genre.to_lowercase()),
            );
        }

        let paginator = select.paginate(&self.pool, params.page_size());
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(|m| ArtistResponse::from_model(m, &self.media_base))
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// Case-insensitive substring match on name, genre and hometown.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<ArtistResponse>> {
        let Some(term) = optional_text(query.q.clone()) else {
            return Ok(Vec::new());
        };
        let pattern = like_pattern(&term);
        let limit = query.limit.unwrap_or(20).clamp(1, MAX_SEARCH_RESULTS);

        let condition = Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(artists::Column::Name))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(Expr::col(artists::Column::Genre))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(Expr::col(artists::Column::Hometown))).like(pattern));

        let models = artists::Entity::find()
            .filter(condition)
            .order_by_asc(artists::Column::Name)
            .limit(limit as u64)
            .all(&self.pool)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| ArtistResponse::from_model(m, &self.media_base))
            .collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<ArtistResponse> {
        let artist = self.find(id).await?;
        Ok(ArtistResponse::from_model(artist, &self.media_base))
    }

    /// Create the caller's artist profile and link it to their account.
    pub async fn create(&self, user_id: i64, req: CreateArtistRequest) -> AppResult<ArtistResponse> {
        let name = require_text("Name", &req.name, 255)?;

        let txn = self.pool.begin().await?;
        // concurrent creates for the same account serialize here
        let user = lock_user(&txn, user_id).await?;
        if user.role != UserRole::Artist {
            return Err(AppError::PermissionDenied);
        }
        if user.artist_id.is_some() {
            return Err(AppError::Conflict(
                "An artist profile already exists for this account".to_string(),
            ));
        }

        let inserted = artists::ActiveModel {
            name: Set(name),
            genre: Set(optional_text(req.genre)),
            bio: Set(optional_text(req.bio)),
            hometown: Set(optional_text(req.hometown)),
            image: Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u))),
            gallery: Set(encode_gallery(&[])),
            // owner_id is the row's own id, patched right after the insert
            owner_type: Set(AccountOwnerType::Artist),
            owner_id: Set(0),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let artist_id = inserted.id;
        let mut am = inserted.into_active_model();
        am.owner_id = Set(artist_id);
        let artist = am.update(&txn).await?;

        let mut user = user.into_active_model();
        user.artist_id = Set(Some(artist.id));
        user.updated_at = Set(Some(Utc::now()));
        user.update(&txn).await?;
        txn.commit().await?;

        log::info!("User {user_id} created artist profile {}", artist.id);
        Ok(ArtistResponse::from_model(artist, &self.media_base))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        req: UpdateArtistRequest,
    ) -> AppResult<ArtistResponse> {
        let artist = self.find_owned(user_id, id).await?;

        let mut am = artist.into_active_model();
        if let Some(name) = &req.name {
            am.name = Set(require_text("Name", name, 255)?);
        }
        if req.genre.is_some() {
            am.genre = Set(optional_text(req.genre));
        }
        if req.bio.is_some() {
            am.bio = Set(optional_text(req.bio));
        }
        if req.hometown.is_some() {
            am.hometown = Set(optional_text(req.hometown));
        }
        if req.image.is_some() {
            am.image = Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u)));
        }
        if let Some(gallery) = &req.gallery {
            am.gallery = Set(encode_gallery(&strip_media_bases(&self.media_base, gallery)));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(ArtistResponse::from_model(updated, &self.media_base))
    }

    pub async fn append_gallery(
        &self,
        user_id: i64,
        id: i64,
        paths: Vec<String>,
    ) -> AppResult<ArtistResponse> {
        let txn = self.pool.begin().await?;
        let artist = artists::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;
        let principal = load_principal(&txn, user_id).await?;
        ensure_owner(&principal, Owner::from_parts(artist.owner_type, artist.owner_id))?;

        let mut gallery = decode_gallery(&artist.gallery);
        gallery.extend(paths);
        let mut am = artist.into_active_model();
        am.gallery = Set(encode_gallery(&gallery));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        Ok(ArtistResponse::from_model(updated, &self.media_base))
    }

    /// Artist row, provided `user_id` controls it.
    pub async fn find_owned(&self, user_id: i64, id: i64) -> AppResult<artists::Model> {
        let artist = self.find(id).await?;
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_owner(&principal, Owner::from_parts(artist.owner_type, artist.owner_id))?;
        Ok(artist)
    }

    async fn find(&self, id: i64) -> AppResult<artists::Model> {
        artists::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user_entity as users;
    use sea_orm::{DatabaseBackend, MockDatabase};

    const BASE: &str = "http://localhost:8080";

    fn user(role: UserRole, artist_id: Option<i64>) -> users::Model {
        users::Model {
            id: 7,
            email: "band@example.com".to_string(),
            username: "band".to_string(),
            password_hash: "x".to_string(),
            role,
            artist_id,
            organiser_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn artist(owner_id: i64, gallery: serde_json::Value) -> artists::Model {
        artists::Model {
            id: 3,
            name: "The Night Owls".to_string(),
            genre: None,
            bio: None,
            hometown: None,
            image: None,
            gallery,
            owner_type: AccountOwnerType::Artist,
            owner_id,
            created_at: None,
            updated_at: None,
        }
    }

    fn create_req() -> CreateArtistRequest {
        CreateArtistRequest {
            name: "The Night Owls".to_string(),
            genre: None,
            bio: None,
            hometown: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_checks_existing_profile_under_row_lock() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(UserRole::Artist, Some(3))]])
            .into_connection();
        let svc = ArtistService::new(pool.clone(), BASE.to_string());

        let err = svc.create(7, create_req()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let log = pool.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("FOR UPDATE"));
    }

    #[tokio::test]
    async fn test_create_links_profile_to_locked_user() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(UserRole::Artist, None)]])
            .append_query_results([vec![artist(0, serde_json::json!([]))]])
            .append_query_results([vec![artist(3, serde_json::json!([]))]])
            .append_query_results([vec![user(UserRole::Artist, Some(3))]])
            .into_connection();
        let svc = ArtistService::new(pool.clone(), BASE.to_string());

        let created = svc.create(7, create_req()).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.owner, Owner::Artist(3));

        // lock, insert, owner patch and user link share one transaction
        let log = pool.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = format!("{:?}", log[0]);
        assert!(statements.contains("FOR UPDATE"));
        assert!(statements.contains("INSERT INTO"));
        assert!(statements.matches("UPDATE").count() >= 3);
    }

    #[tokio::test]
    async fn test_create_requires_artist_role() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(UserRole::User, None)]])
            .into_connection();
        let svc = ArtistService::new(pool, BASE.to_string());

        let err = svc.create(7, create_req()).await.unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_append_gallery_locks_artist_row() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![artist(3, serde_json::json!(["uploads/artists/a.png"]))]])
            .append_query_results([vec![user(UserRole::Artist, Some(3))]])
            .append_query_results([vec![artist(
                3,
                serde_json::json!(["uploads/artists/a.png", "uploads/artists/b.png"]),
            )]])
            .into_connection();
        let svc = ArtistService::new(pool.clone(), BASE.to_string());

        let updated = svc
            .append_gallery(7, 3, vec!["uploads/artists/b.png".to_string()])
            .await
            .unwrap();
        assert_eq!(updated.gallery.len(), 2);

        let log = pool.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = format!("{:?}", log[0]);
        assert!(statements.contains("FOR UPDATE"));
        // the write carries both the existing and the new path
        assert!(statements.contains("uploads/artists/a.png"));
        assert!(statements.contains("uploads/artists/b.png"));
    }

    #[tokio::test]
    async fn test_append_gallery_rejects_non_owner() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![artist(3, serde_json::json!([]))]])
            .append_query_results([vec![user(UserRole::Artist, Some(4))]])
            .into_connection();
        let svc = ArtistService::new(pool, BASE.to_string());

        let err = svc
            .append_gallery(7, 3, vec!["uploads/artists/b.png".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[test]
    fn test_like_pattern_strips_wildcards() {
        assert_eq!(like_pattern(" Night Owls "), "%night owls%");
        assert_eq!(like_pattern("100%_rock"), "%100rock%");
        assert_eq!(like_pattern(""), "%%");
    }
}
