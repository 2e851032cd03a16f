use crate::entities::notification_entity as notifications;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access::owner_account_id;
use crate::utils::{PaginatedResponse, PaginationParams};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn notify(
        &self,
        user_id: i64,
        kind: &str,
        message: String,
        link: Option<String>,
    ) -> AppResult<()> {
        notifications::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            message: Set(message),
            link: Set(link),
            is_read: Set(false),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    /// Notify whoever controls `owner`, unless that is the acting user.
    ///
    /// Failures are logged and swallowed so the triggering write still succeeds.
    pub async fn notify_owner(
        &self,
        owner: Owner,
        actor_id: i64,
        kind: &str,
        message: String,
        link: Option<String>,
    ) {
        let recipient = match owner_account_id(&self.pool, owner).await {
            Ok(Some(id)) if id != actor_id => id,
            Ok(_) => return,
            Err(e) => {
                log::warn!("Failed to resolve notification recipient for {owner:?}: {e}");
                return;
            }
        };
        if let Err(e) = self.notify(recipient, kind, message, link).await {
            log::warn!("Failed to create {kind} notification for user {recipient}: {e}");
        }
    }

    pub async fn list(
        &self,
        user_id: i64,
        query: &NotificationQuery,
    ) -> AppResult<PaginatedResponse<NotificationResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id);
        if query.unread_only.unwrap_or(false) {
            select = select.filter(notifications::Column::IsRead.eq(false));
        }

        let paginator = select.paginate(&self.pool, params.page_size());
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(NotificationResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn unread_count(&self, user_id: i64) -> AppResult<UnreadCountResponse> {
        let unread = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.pool)
            .await?;
        Ok(UnreadCountResponse {
            unread: unread as i64,
        })
    }

    pub async fn mark_read(&self, user_id: i64, id: i64) -> AppResult<NotificationResponse> {
        let notification = notifications::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;
        if notification.user_id != user_id {
            return Err(AppError::PermissionDenied);
        }
        if notification.is_read {
            return Ok(NotificationResponse::from(notification));
        }

        let mut am = notification.into_active_model();
        am.is_read = Set(true);
        let updated = am.update(&self.pool).await?;
        Ok(NotificationResponse::from(updated))
    }

    pub async fn mark_all_read(&self, user_id: i64) -> AppResult<ProcessedCount> {
        let result = notifications::Entity::update_many()
            .set(notifications::ActiveModel {
                is_read: Set(true),
                ..Default::default()
            })
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.pool)
            .await?;
        Ok(ProcessedCount {
            processed_count: result.rows_affected,
        })
    }
}
