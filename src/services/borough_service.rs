// src/services/borough_service.rs
// DOCUMENTATION: Business logic for borough pages
// PURPOSE: Orchestrate validation, derived fields, storage and the repository layer

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::BoroughSettings;
use crate::db::{BoroughRepository, PhotoRepository, UserRepository};
use crate::errors::BoroughsError;
use crate::models::{
    Borough, CreateBoroughRequest, ImageSlot, NewBorough, Photo, UpdateBoroughRequest,
    UploadedImage,
};
use crate::storage::Storage;

/// Boroughs shown on the index page
pub const INDEX_BOROUGH_LIMIT: i64 = 50;

pub struct BoroughService;

impl BoroughService {
    /// Create a borough; slug and timestamps are derived here, never supplied
    pub async fn create_borough(
        pool: &PgPool,
        settings: &BoroughSettings,
        req: CreateBoroughRequest,
    ) -> Result<Borough, BoroughsError> {
        let new = NewBorough::prepare(req, settings, Utc::now())?;
        Self::ensure_author(pool, new.author_id).await?;
        BoroughRepository::create_borough(pool, &new).await
    }

    /// Edit a borough; the slug follows the (possibly new) title
    pub async fn update_borough(
        pool: &PgPool,
        settings: &BoroughSettings,
        id: Uuid,
        req: UpdateBoroughRequest,
    ) -> Result<Borough, BoroughsError> {
        let mut borough = BoroughRepository::get_by_id(pool, id).await?;
        if let Some(author_id) = req.author_id.filter(|a| *a != borough.author_id) {
            Self::ensure_author(pool, author_id).await?;
        }
        borough.apply_update(req, settings, Utc::now())?;
        BoroughRepository::update_borough(pool, &borough).await
    }

    /// An author reference must name an existing user
    async fn ensure_author(pool: &PgPool, author_id: Uuid) -> Result<(), BoroughsError> {
        match UserRepository::get_by_id(pool, author_id).await {
            Ok(_) => Ok(()),
            Err(BoroughsError::NotFound(_)) => Err(BoroughsError::ValidationError(
                "author: unknown user".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Delete a borough. Blocked while photos reference it.
    pub async fn delete_borough(pool: &PgPool, id: Uuid) -> Result<(), BoroughsError> {
        BoroughRepository::delete_borough(pool, id).await
    }

    pub async fn list_boroughs(pool: &PgPool) -> Result<Vec<Borough>, BoroughsError> {
        BoroughRepository::list_boroughs(pool, INDEX_BOROUGH_LIMIT).await
    }

    /// A borough page: the borough and its approved photos
    pub async fn get_details(
        pool: &PgPool,
        slug: &str,
    ) -> Result<(Borough, Vec<Photo>), BoroughsError> {
        let borough = BoroughRepository::get_by_slug(pool, slug).await?;
        let photos = PhotoRepository::get_photos_by_borough(pool, borough.id, true).await?;
        Ok((borough, photos))
    }

    /// Store an image and attach it to one of the borough's four slots
    pub async fn upload_image(
        pool: &PgPool,
        storage: &dyn Storage,
        settings: &BoroughSettings,
        id: Uuid,
        slot: ImageSlot,
        image: UploadedImage,
    ) -> Result<Borough, BoroughsError> {
        let format = image.validate()?;
        let mut borough = BoroughRepository::get_by_id(pool, id).await?;

        let name = storage
            .save(
                &slot.upload_dir(&borough.slug),
                &image.storage_name(format),
                &image.data,
            )
            .await?;

        if let Some(previous) = borough.image(slot) {
            log::info!(
                "Replacing {} of borough {} (was {})",
                slot.column(),
                borough.id,
                previous
            );
        }

        borough.set_image(slot, Some(name));
        borough.touch(settings, Utc::now())?;
        BoroughRepository::set_image(pool, &borough, slot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    #[tokio::test]
    async fn test_invalid_title_rejected_before_database() {
        let req = fixtures::borough_request(Uuid::new_v4(), "!!!");
        let result =
            BoroughService::create_borough(&fixtures::lazy_pool(), &BoroughSettings::default(), req).await;
        assert!(matches!(result, Err(BoroughsError::ValidationError(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_unknown_author_rejected(pool: PgPool) {
        let req = fixtures::borough_request(Uuid::new_v4(), "Cole Valley");
        let result = BoroughService::create_borough(&pool, &BoroughSettings::default(), req).await;
        assert!(matches!(result, Err(BoroughsError::ValidationError(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_same_slug_conflicts(pool: PgPool) {
        let settings = BoroughSettings::default();
        let author = fixtures::user(&pool, "ada").await;
        BoroughService::create_borough(&pool, &settings, fixtures::borough_request(author.id, "Mission District"))
            .await
            .unwrap();

        let result = BoroughService::create_borough(
            &pool,
            &settings,
            fixtures::borough_request(author.id, "mission-district!"),
        )
        .await;
        assert!(matches!(result, Err(BoroughsError::AlreadyExists(_))));
    }
}
