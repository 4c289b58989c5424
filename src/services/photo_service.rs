// src/services/photo_service.rs
// DOCUMENTATION: Business logic for photo submissions
// PURPOSE: Accept uploads, moderate and count votes

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{BoroughRepository, PhotoRepository};
use crate::errors::BoroughsError;
use crate::models::{NewPhoto, Photo, PhotoSubmission, UploadedImage};
use crate::storage::{Storage, Visibility};

/// Directory (inside the public backend) that photo submissions land in
pub const PHOTO_UPLOAD_DIR: &str = "photos";

/// Recently published photos shown on the index page
pub const RECENT_PHOTO_LIMIT: i64 = 12;

pub struct PhotoService;

impl PhotoService {
    /// Store the uploaded image, then record the submission.
    /// New photos always start unapproved with zero votes.
    pub async fn submit_photo(
        pool: &PgPool,
        storage: &dyn Storage,
        submission: PhotoSubmission,
        image: UploadedImage,
    ) -> Result<Photo, BoroughsError> {
        if storage.visibility() != Visibility::Public {
            log::error!("Photo uploads need a public storage backend");
            return Err(BoroughsError::StorageError(
                "photo storage is not public".to_string(),
            ));
        }
        let format = image.validate()?;

        BoroughRepository::get_by_id(pool, submission.borough_id)
            .await
            .map_err(|e| match e {
                BoroughsError::NotFound(_) => BoroughsError::ValidationError(
                    "borough: select a valid choice".to_string(),
                ),
                other => other,
            })?;

        let name = storage
            .save(PHOTO_UPLOAD_DIR, &image.storage_name(format), &image.data)
            .await?;

        let new = NewPhoto::prepare(submission, name, Utc::now());
        match PhotoRepository::create_photo(pool, &new).await {
            Ok(photo) => Ok(photo),
            Err(err) => {
                if let Err(e) = storage.delete(&new.image).await {
                    log::warn!("Photo insert failed and {} was left behind: {}", new.image, e);
                }
                Err(err)
            }
        }
    }

    pub async fn recent_photos(pool: &PgPool) -> Result<Vec<Photo>, BoroughsError> {
        PhotoRepository::get_recent_photos(pool, Utc::now(), RECENT_PHOTO_LIMIT).await
    }

    pub async fn set_approved(
        pool: &PgPool,
        id: Uuid,
        approved: bool,
    ) -> Result<Photo, BoroughsError> {
        PhotoRepository::set_approved(pool, id, approved).await
    }

    /// Votes only count for approved photos
    pub async fn vote(pool: &PgPool, id: Uuid) -> Result<Photo, BoroughsError> {
        let photo = PhotoRepository::get_by_id(pool, id).await?;
        if !photo.approved {
            return Err(BoroughsError::NotFound(format!("photo {}", id)));
        }
        PhotoRepository::add_vote(pool, id).await
    }

    /// Remove a photo and its stored image
    pub async fn delete_photo(
        pool: &PgPool,
        storage: &dyn Storage,
        id: Uuid,
    ) -> Result<(), BoroughsError> {
        let photo = PhotoRepository::get_by_id(pool, id).await?;
        PhotoRepository::delete_photo(pool, id).await?;

        match storage.exists(&photo.image).await {
            Ok(true) => {
                if let Err(e) = storage.delete(&photo.image).await {
                    log::warn!("Photo {} deleted but its image {} remains: {}", id, photo.image, e);
                }
            }
            Ok(false) => log::warn!("Photo {} had no stored image at {}", id, photo.image),
            Err(e) => log::warn!("Photo {} deleted, could not check {}: {}", id, photo.image, e),
        }
        Ok(())
    }
}
