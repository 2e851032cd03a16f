use crate::entities::{
    FeatureOwnerType, PurchasedFeatureStatus, artist_entity as artists, event_entity as events,
    paid_feature_entity as paid_features, purchased_feature_entity as purchased_features,
    venue_entity as venues,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access::{ensure_admin, ensure_owner, load_principal};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use serde_json::json;

#[derive(Clone)]
pub struct FeatureService {
    pool: DatabaseConnection,
}

fn transition(
    current: PurchasedFeatureStatus,
    next: PurchasedFeatureStatus,
) -> AppResult<PurchasedFeatureStatus> {
    if current.can_transition_to(next) {
        Ok(next)
    } else {
        Err(AppError::ValidationError(format!(
            "Cannot move a {current} feature to {next}"
        )))
    }
}

fn duplicate_purchase(feature: &paid_features::Model, owner_type: FeatureOwnerType) -> AppError {
    AppError::Conflict(format!(
        "{} is already pending or active for this {owner_type}",
        feature.name
    ))
}

/// A unique violation on `uq_purchased_features_open` means a concurrent purchase won.
fn purchase_insert_error(
    err: DbErr,
    feature: &paid_features::Model,
    owner_type: FeatureOwnerType,
) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_purchase(feature, owner_type),
        _ => AppError::from(err),
    }
}

/// Purchase rules that need no database access. Returns the metadata to store.
fn check_purchase(
    feature: &paid_features::Model,
    owner: FeatureOwner,
    open_count: u64,
    metadata: Option<serde_json::Value>,
) -> AppResult<serde_json::Value> {
    if let Some(applies_to) = feature.applies_to
        && applies_to != owner.owner_type()
    {
        return Err(AppError::ValidationError(format!(
            "{} can only be purchased for a {applies_to}",
            feature.name
        )));
    }
    if open_count > 0 {
        return Err(duplicate_purchase(feature, owner.owner_type()));
    }

    match metadata {
        Some(value @ serde_json::Value::Object(_)) => Ok(value),
        Some(serde_json::Value::Null) | None => Ok(json!({})),
        Some(_) => Err(AppError::ValidationError(
            "metadata must be a JSON object".to_string(),
        )),
    }
}

impl FeatureService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Purchasable features, cheapest first.
    pub async fn catalog(&self) -> AppResult<Vec<PaidFeatureResponse>> {
        let features = paid_features::Entity::find()
            .filter(paid_features::Column::IsActive.eq(true))
            .order_by_asc(paid_features::Column::PriceCents)
            .all(&self.pool)
            .await?;
        Ok(features.into_iter().map(PaidFeatureResponse::from).collect())
    }

    pub async fn list_for_owner(
        &self,
        user_id: i64,
        owner: FeatureOwner,
    ) -> AppResult<Vec<PurchasedFeatureResponse>> {
        self.ensure_feature_owner(user_id, owner).await?;
        let (owner_type, owner_id) = owner.into_parts();

        let rows = purchased_features::Entity::find()
            .filter(purchased_features::Column::OwnerType.eq(owner_type))
            .filter(purchased_features::Column::OwnerId.eq(owner_id))
            .order_by_desc(purchased_features::Column::CreatedAt)
            .order_by_desc(purchased_features::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PurchasedFeatureResponse::from).collect())
    }

    /// Record a pending purchase; activation happens once payment is confirmed.
    pub async fn purchase(
        &self,
        user_id: i64,
        req: PurchaseFeatureRequest,
    ) -> AppResult<PurchasedFeatureResponse> {
        self.ensure_feature_owner(user_id, req.owner).await?;

        let feature = paid_features::Entity::find_by_id(req.feature_id)
            .one(&self.pool)
            .await?
            .filter(|f| f.is_active)
            .ok_or_else(|| AppError::NotFound("Feature not found".to_string()))?;
        let (owner_type, owner_id) = req.owner.into_parts();
        let open = purchased_features::Entity::find()
            .filter(purchased_features::Column::OwnerType.eq(owner_type))
            .filter(purchased_features::Column::OwnerId.eq(owner_id))
            .filter(purchased_features::Column::FeatureId.eq(feature.id))
            .filter(purchased_features::Column::Status.ne(PurchasedFeatureStatus::Canceled))
            .filter(purchased_features::Column::Status.ne(PurchasedFeatureStatus::Expired))
            .count(&self.pool)
            .await?;
        let metadata = check_purchase(&feature, req.owner, open, req.metadata)?;

        let purchased = purchased_features::ActiveModel {
            owner_type: Set(owner_type),
            owner_id: Set(owner_id),
            feature_id: Set(feature.id),
            status: Set(PurchasedFeatureStatus::Pending),
            starts_at: Set(None),
            ends_at: Set(None),
            price_paid: Set(feature.price_cents),
            metadata: Set(metadata),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| purchase_insert_error(e, &feature, owner_type))?;

        log::info!(
            "User {user_id} purchased feature {} for {owner_type} {owner_id} (purchase {})",
            feature.code,
            purchased.id
        );
        Ok(PurchasedFeatureResponse::from(purchased))
    }

    /// Admin confirmation of payment: starts the paid period.
    pub async fn activate(&self, user_id: i64, id: i64) -> AppResult<PurchasedFeatureResponse> {
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_admin(&principal)?;

        let purchased = self.find(id).await?;
        let next = transition(purchased.status, PurchasedFeatureStatus::Active)?;
        let feature = paid_features::Entity::find_by_id(purchased.feature_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Feature not found".to_string()))?;

        let now = Utc::now();
        let mut am = purchased.into_active_model();
        am.status = Set(next);
        am.starts_at = Set(Some(now));
        am.ends_at = Set(Some(now + Duration::days(feature.duration_days as i64)));
        am.updated_at = Set(Some(now));
        let updated = am.update(&self.pool).await?;

        log::info!("Admin {user_id} activated purchased feature {id}");
        Ok(PurchasedFeatureResponse::from(updated))
    }

    pub async fn cancel(&self, user_id: i64, id: i64) -> AppResult<PurchasedFeatureResponse> {
        let purchased = self.find(id).await?;
        self.ensure_feature_owner(
            user_id,
            FeatureOwner::from_parts(purchased.owner_type, purchased.owner_id),
        )
        .await?;
        let next = transition(purchased.status, PurchasedFeatureStatus::Canceled)?;

        let mut am = purchased.into_active_model();
        am.status = Set(next);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!("User {user_id} canceled purchased feature {id}");
        Ok(PurchasedFeatureResponse::from(updated))
    }

    /// Admin trigger for the same sweep the background task runs.
    pub async fn expire_now(&self, user_id: i64) -> AppResult<ProcessedCount> {
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_admin(&principal)?;
        self.expire_due().await
    }

    /// Every active feature whose period has ended becomes expired.
    pub async fn expire_due(&self) -> AppResult<ProcessedCount> {
        let now = Utc::now();
        let result = purchased_features::Entity::update_many()
            .set(purchased_features::ActiveModel {
                status: Set(PurchasedFeatureStatus::Expired),
                updated_at: Set(Some(now)),
                ..Default::default()
            })
            .filter(purchased_features::Column::Status.eq(PurchasedFeatureStatus::Active))
            .filter(purchased_features::Column::EndsAt.lte(now))
            .exec(&self.pool)
            .await?;

        if result.rows_affected > 0 {
            log::info!("Expired {} purchased features", result.rows_affected);
        }
        Ok(ProcessedCount {
            processed_count: result.rows_affected,
        })
    }

    /// Ownership of an artist, venue or event, checked through its account owner.
    async fn ensure_feature_owner(&self, user_id: i64, owner: FeatureOwner) -> AppResult<()> {
        let account_owner = match owner {
            FeatureOwner::Artist(id) => artists::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .map(|m| Owner::from_parts(m.owner_type, m.owner_id)),
            FeatureOwner::Venue(id) => venues::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .map(|m| Owner::from_parts(m.owner_type, m.owner_id)),
            FeatureOwner::Event(id) => events::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .map(|m| Owner::from_parts(m.owner_type, m.owner_id)),
        };
        let (owner_type, owner_id) = owner.into_parts();
        let account_owner = account_owner
            .ok_or_else(|| AppError::NotFound(format!("{owner_type} {owner_id} not found")))?;

        let principal = load_principal(&self.pool, user_id).await?;
        ensure_owner(&principal, account_owner)
    }

    async fn find(&self, id: i64) -> AppResult<purchased_features::Model> {
        purchased_features::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchased feature not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PurchasedFeatureStatus::*;

    #[test]
    fn test_transition_allows_lifecycle_moves() {
        assert_eq!(transition(Pending, Active).unwrap(), Active);
        assert_eq!(transition(Active, Canceled).unwrap(), Canceled);
    }

    #[test]
    fn test_transition_rejects_out_of_order_moves() {
        let err = transition(Expired, Canceled).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(transition(Pending, Expired).is_err());
        assert!(transition(Canceled, Active).is_err());
    }

    fn feature(applies_to: Option<FeatureOwnerType>) -> paid_features::Model {
        paid_features::Model {
            id: 1,
            code: "featured_listing".to_string(),
            name: "Featured listing".to_string(),
            description: None,
            price_cents: 1500,
            duration_days: 30,
            applies_to,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_check_purchase_rules() {
        let venue = FeatureOwner::Venue(4);
        let cases: Vec<(Option<FeatureOwnerType>, u64, Option<serde_json::Value>, &str)> = vec![
            (None, 0, None, "ok"),
            (Some(FeatureOwnerType::Venue), 0, Some(json!({"slot": 2})), "ok"),
            (Some(FeatureOwnerType::Artist), 0, None, "VALIDATION_ERROR"),
            (None, 1, None, "CONFLICT"),
            (None, 0, Some(json!([1, 2])), "VALIDATION_ERROR"),
            (None, 0, Some(json!("note")), "VALIDATION_ERROR"),
        ];

        for (applies_to, open, metadata, expected) in cases {
            let result = check_purchase(&feature(applies_to), venue, open, metadata);
            let got = match &result {
                Ok(_) => "ok",
                Err(AppError::ValidationError(_)) => "VALIDATION_ERROR",
                Err(AppError::Conflict(_)) => "CONFLICT",
                Err(_) => "other",
            };
            assert_eq!(got, expected, "applies_to={applies_to:?} open={open}");
        }
    }

    #[test]
    fn test_check_purchase_metadata_defaults_to_object() {
        let feature = feature(None);
        let owner = FeatureOwner::Event(9);
        assert_eq!(check_purchase(&feature, owner, 0, None).unwrap(), json!({}));
        assert_eq!(
            check_purchase(&feature, owner, 0, Some(serde_json::Value::Null)).unwrap(),
            json!({})
        );
        assert_eq!(
            check_purchase(&feature, owner, 0, Some(json!({"a": 1}))).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_insert_errors_other_than_unique_violation_pass_through() {
        let err = purchase_insert_error(
            DbErr::Custom("connection reset".to_string()),
            &feature(None),
            FeatureOwnerType::Venue,
        );
        assert!(matches!(err, AppError::DatabaseError(_)));

        let dup = duplicate_purchase(&feature(None), FeatureOwnerType::Venue);
        assert!(matches!(dup, AppError::Conflict(ref m) if m.contains("Featured listing")));
    }

    #[test]
    fn test_owner_type_mismatch_wins_over_duplicate() {
        let err = check_purchase(
            &feature(Some(FeatureOwnerType::Event)),
            FeatureOwner::Artist(1),
            1,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
