use crate::entities::{AccountOwnerType, UserRole, organiser_entity as organisers};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::access::{ensure_owner, load_principal, lock_user};
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct OrganiserService {
    pool: DatabaseConnection,
    media_base: String,
}

impl OrganiserService {
    pub fn new(pool: DatabaseConnection, media_base: String) -> Self {
        Self { pool, media_base }
    }

    pub async fn get(&self, id: i64) -> AppResult<OrganiserResponse> {
        let organiser = self.find(id).await?;
        Ok(OrganiserResponse::from_model(organiser, &self.media_base))
    }

    /// Create the caller's organiser profile and link it to their account.
    pub async fn create(
        &self,
        user_id: i64,
        req: CreateOrganiserRequest,
    ) -> AppResult<OrganiserResponse> {
        let name = require_text("Name", &req.name, 255)?;
        let contact_email = optional_text(req.contact_email).map(|e| normalize_email(&e));
        if let Some(email) = &contact_email {
            validate_email(email)?;
        }

        let txn = self.pool.begin().await?;
        let user = lock_user(&txn, user_id).await?;
        if user.role != UserRole::Organiser {
            return Err(AppError::PermissionDenied);
        }
        if user.organiser_id.is_some() {
            return Err(AppError::Conflict(
                "An organiser profile already exists for this account".to_string(),
            ));
        }

        let inserted = organisers::ActiveModel {
            name: Set(name),
            contact_email: Set(contact_email),
            website: Set(optional_text(req.website)),
            bio: Set(optional_text(req.bio)),
            image: Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u))),
            gallery: Set(encode_gallery(&[])),
            owner_type: Set(AccountOwnerType::Organiser),
            owner_id: Set(0),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let organiser_id = inserted.id;
        let mut am = inserted.into_active_model();
        am.owner_id = Set(organiser_id);
        let organiser = am.update(&txn).await?;

        let mut user = user.into_active_model();
        user.organiser_id = Set(Some(organiser.id));
        user.updated_at = Set(Some(Utc::now()));
        user.update(&txn).await?;
        txn.commit().await?;

        log::info!("User {user_id} created organiser profile {}", organiser.id);
        Ok(OrganiserResponse::from_model(organiser, &self.media_base))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        req: UpdateOrganiserRequest,
    ) -> AppResult<OrganiserResponse> {
        let organiser = self.find(id).await?;
        let principal = load_principal(&self.pool, user_id).await?;
        ensure_owner(
            &principal,
            Owner::from_parts(organiser.owner_type, organiser.owner_id),
        )?;

        let mut am = organiser.into_active_model();
        if let Some(name) = &req.name {
            am.name = Set(require_text("Name", name, 255)?);
        }
        if req.contact_email.is_some() {
            let email = optional_text(req.contact_email).map(|e| normalize_email(&e));
            if let Some(email) = &email {
                validate_email(email)?;
            }
            am.contact_email = Set(email);
        }
        if req.website.is_some() {
            am.website = Set(optional_text(req.website));
        }
        if req.bio.is_some() {
            am.bio = Set(optional_text(req.bio));
        }
        if req.image.is_some() {
            am.image = Set(optional_text(req.image).map(|u| strip_media_base(&self.media_base, &u)));
        }
        if let Some(gallery) = &req.gallery {
            am.gallery = Set(encode_gallery(&strip_media_bases(&self.media_base, gallery)));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(OrganiserResponse::from_model(updated, &self.media_base))
    }

    async fn find(&self, id: i64) -> AppResult<organisers::Model> {
        organisers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Organiser not found".to_string()))
    }
}
