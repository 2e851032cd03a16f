//! Server-side authorization helpers shared by every service.

use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{Owner, Principal};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

/// Load the acting account; role and profile ids always come from the database.
pub async fn load_principal<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<Principal> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;
    Ok(Principal::from(&user))
}

/// User row locked `FOR UPDATE` until the surrounding transaction ends.
pub async fn lock_user<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<users::Model> {
    users::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))
}

pub fn ensure_owner(principal: &Principal, owner: Owner) -> AppResult<()> {
    if principal.is_owner(owner) {
        Ok(())
    } else {
        log::warn!(
            "User {} attempted to modify a resource owned by {:?}",
            principal.id,
            owner
        );
        Err(AppError::PermissionDenied)
    }
}

pub fn ensure_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Account id behind an owner, used to address notifications.
pub async fn owner_account_id<C: ConnectionTrait>(db: &C, owner: Owner) -> AppResult<Option<i64>> {
    let query = match owner {
        Owner::User(id) => return Ok(Some(id)),
        Owner::Artist(artist_id) => users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Artist))
            .filter(users::Column::ArtistId.eq(artist_id)),
        Owner::Organiser(organiser_id) => users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Organiser))
            .filter(users::Column::OrganiserId.eq(organiser_id)),
    };
    Ok(query.one(db).await?.map(|u| u.id))
}
