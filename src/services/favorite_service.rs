use crate::entities::{
    FavoriteType, artist_entity as artists, event_entity as events, favorite_entity as favorites,
    organiser_entity as organisers, venue_entity as venues,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::NotificationService;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// What a favorite points at, resolved for the owner notification.
struct FavoriteTarget {
    owner: Owner,
    label: String,
    link: String,
}

#[derive(Clone)]
pub struct FavoriteService {
    pool: DatabaseConnection,
    notifications: NotificationService,
}

impl FavoriteService {
    pub fn new(pool: DatabaseConnection, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    pub async fn list(&self, user_id: i64, query: &FavoriteQuery) -> AppResult<Vec<FavoriteResponse>> {
        let mut select = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .order_by_desc(favorites::Column::Id);
        if let Some(item_type) = query.item_type {
            select = select.filter(favorites::Column::ItemType.eq(item_type));
        }

        let items = select.all(&self.pool).await?;
        Ok(items.into_iter().map(FavoriteResponse::from).collect())
    }

    /// Idempotent: favoriting twice leaves a single row.
    pub async fn add(&self, user_id: i64, req: FavoriteRequest) -> AppResult<FavoriteStatusResponse> {
        let target = self.resolve_target(req.item_type, req.item_id).await?;

        let inserted = favorites::Entity::insert(favorites::ActiveModel {
            user_id: Set(user_id),
            item_type: Set(req.item_type),
            item_id: Set(req.item_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                favorites::Column::UserId,
                favorites::Column::ItemType,
                favorites::Column::ItemId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.pool)
        .await?;

        if inserted > 0 {
            log::info!("User {user_id} favorited {} {}", req.item_type, req.item_id);
            self.notifications
                .notify_owner(
                    target.owner,
                    user_id,
                    "favorite",
                    format!("Someone added {} to their favorites", target.label),
                    Some(target.link),
                )
                .await;
        }

        Ok(status(req, true))
    }

    /// Idempotent: removing a missing favorite succeeds.
    pub async fn remove(&self, user_id: i64, req: FavoriteRequest) -> AppResult<FavoriteStatusResponse> {
        favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::ItemType.eq(req.item_type))
            .filter(favorites::Column::ItemId.eq(req.item_id))
            .exec(&self.pool)
            .await?;
        Ok(status(req, false))
    }

    pub async fn toggle(&self, user_id: i64, req: FavoriteRequest) -> AppResult<FavoriteStatusResponse> {
        if self.is_favorited(user_id, req).await?.favorited {
            self.remove(user_id, req).await
        } else {
            self.add(user_id, req).await
        }
    }

    pub async fn is_favorited(
        &self,
        user_id: i64,
        req: FavoriteRequest,
    ) -> AppResult<FavoriteStatusResponse> {
        let count = favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::ItemType.eq(req.item_type))
            .filter(favorites::Column::ItemId.eq(req.item_id))
            .count(&self.pool)
            .await?;
        Ok(status(req, count > 0))
    }

    async fn resolve_target(&self, item_type: FavoriteType, item_id: i64) -> AppResult<FavoriteTarget> {
        let not_found = || AppError::NotFound(format!("{item_type} {item_id} not found"));
        let target = match item_type {
            FavoriteType::Artist => {
                let m = artists::Entity::find_by_id(item_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(not_found)?;
                FavoriteTarget {
                    owner: Owner::from_parts(m.owner_type, m.owner_id),
                    label: m.name,
                    link: format!("/artists/{item_id}"),
                }
            }
            FavoriteType::Venue => {
                let m = venues::Entity::find_by_id(item_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(not_found)?;
                FavoriteTarget {
                    owner: Owner::from_parts(m.owner_type, m.owner_id),
                    label: m.name,
                    link: format!("/venue/{item_id}"),
                }
            }
            FavoriteType::Event => {
                let m = events::Entity::find_by_id(item_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(not_found)?;
                FavoriteTarget {
                    owner: Owner::from_parts(m.owner_type, m.owner_id),
                    label: m.title,
                    link: format!("/events/{item_id}"),
                }
            }
            FavoriteType::Organiser => {
                let m = organisers::Entity::find_by_id(item_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(not_found)?;
                FavoriteTarget {
                    owner: Owner::from_parts(m.owner_type, m.owner_id),
                    label: m.name,
                    link: format!("/organisers/{item_id}"),
                }
            }
        };
        Ok(target)
    }
}

fn status(req: FavoriteRequest, favorited: bool) -> FavoriteStatusResponse {
    FavoriteStatusResponse {
        item_type: req.item_type,
        item_id: req.item_id,
        favorited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AccountOwnerType;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    const USER: i64 = 1;

    fn artist() -> artists::Model {
        // owned by the acting user, so no notification queries are issued
        artists::Model {
            id: 5,
            name: "The Quiet Room".to_string(),
            genre: Some("jazz".to_string()),
            bio: None,
            hometown: None,
            image: None,
            gallery: serde_json::json!([]),
            owner_type: AccountOwnerType::User,
            owner_id: USER,
            created_at: None,
            updated_at: None,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn service(db: MockDatabase) -> FavoriteService {
        let pool = db.into_connection();
        FavoriteService::new(pool.clone(), NotificationService::new(pool))
    }

    fn req() -> FavoriteRequest {
        FavoriteRequest {
            item_type: FavoriteType::Artist,
            item_id: 5,
        }
    }

    #[tokio::test]
    async fn test_add_then_toggle_unfavorites() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![artist()]])
                .append_query_results([vec![count_row(1)]])
                .append_exec_results([exec(1), exec(1)]),
        );

        assert!(svc.add(USER, req()).await.unwrap().favorited);
        let toggled = svc.toggle(USER, req()).await.unwrap();
        assert!(!toggled.favorited);
        assert_eq!(toggled.item_type, FavoriteType::Artist);
        assert_eq!(toggled.item_id, 5);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(0)]])
                .append_query_results([vec![artist()]])
                .append_query_results([vec![count_row(1)]])
                .append_exec_results([exec(1), exec(1)]),
        );

        assert!(svc.toggle(USER, req()).await.unwrap().favorited);
        assert!(!svc.toggle(USER, req()).await.unwrap().favorited);
    }

    #[tokio::test]
    async fn test_repeated_add_and_remove_are_idempotent() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![artist()], vec![artist()]])
                // second insert hits the unique key and is skipped
                .append_exec_results([exec(1), exec(0), exec(1), exec(0)]),
        );

        assert!(svc.add(USER, req()).await.unwrap().favorited);
        assert!(svc.add(USER, req()).await.unwrap().favorited);
        assert!(!svc.remove(USER, req()).await.unwrap().favorited);
        assert!(!svc.remove(USER, req()).await.unwrap().favorited);
    }

    #[tokio::test]
    async fn test_add_missing_target_is_not_found() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<artists::Model>::new()]),
        );

        let err = svc.add(USER, req()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
