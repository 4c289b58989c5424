// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Handle submissions, moderation and voting for borough photos

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::BoroughsError;
use crate::models::{NewPhoto, Photo};

/// Photo columns plus the owning borough's slug
const PHOTO_SELECT: &str = r#"
    SELECT
        p.id, p.created_at, p.approved, p.borough_id,
        b.slug AS borough_slug,
        p.image, p.content, p.votes,
        p.first_name, p.last_name, p.email
    FROM photos p
    JOIN boroughs b ON b.id = p.borough_id
"#;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Create a new photo
    /// DOCUMENTATION: Moderation state comes from NewPhoto (always unapproved, zero votes)
    pub async fn create_photo(pool: &PgPool, new: &NewPhoto) -> Result<Photo, BoroughsError> {
        sqlx::query(
            r#"
            INSERT INTO photos (
                id, created_at, approved, borough_id, image,
                content, votes, first_name, last_name, email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(new.id)
        .bind(new.created_at)
        .bind(new.approved)
        .bind(new.borough_id)
        .bind(&new.image)
        .bind(&new.content)
        .bind(new.votes)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .execute(pool)
        .await
        .map_err(|e| match BoroughsError::from_sqlx(e, "photo") {
            BoroughsError::Protected(_) => BoroughsError::ValidationError(format!(
                "borough: unknown borough {}",
                new.borough_id
            )),
            other => other,
        })?;

        let photo = Self::get_by_id(pool, new.id).await?;
        log::info!("Created photo {} for borough {}", photo.id, photo.borough_slug);
        Ok(photo)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Photo, BoroughsError> {
        let sql = format!("{} WHERE p.id = $1", PHOTO_SELECT);
        sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("photo {}", id)))?
            .ok_or_else(|| {
                log::warn!("Photo not found: {}", id);
                BoroughsError::NotFound(format!("photo {}", id))
            })
    }

    /// Get photos for a borough
    /// DOCUMENTATION: Most voted first, then newest
    pub async fn get_photos_by_borough(
        pool: &PgPool,
        borough_id: Uuid,
        approved_only: bool,
    ) -> Result<Vec<Photo>, BoroughsError> {
        let sql = format!(
            "{} WHERE p.borough_id = $1 AND ($2 = FALSE OR p.approved) \
             ORDER BY p.votes DESC, p.created_at DESC",
            PHOTO_SELECT
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(borough_id)
            .bind(approved_only)
            .fetch_all(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("photos of borough {}", borough_id)))
    }

    /// Approved photos created within the 24 hours ending at `now`
    pub async fn get_recent_photos(
        pool: &PgPool,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Photo>, BoroughsError> {
        let sql = format!(
            "{} WHERE p.approved AND p.created_at BETWEEN $1 AND $2 \
             ORDER BY p.created_at DESC LIMIT $3",
            PHOTO_SELECT
        );
        sqlx::query_as::<_, Photo>(&sql)
            .bind(now - Duration::days(1))
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, "recent photos"))
    }

    /// Mark a photo approved (or withdraw approval)
    pub async fn set_approved(
        pool: &PgPool,
        id: Uuid,
        approved: bool,
    ) -> Result<Photo, BoroughsError> {
        let result = sqlx::query("UPDATE photos SET approved = $2 WHERE id = $1")
            .bind(id)
            .bind(approved)
            .execute(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("photo {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(BoroughsError::NotFound(format!("photo {}", id)));
        }

        log::info!("Photo {} approved={}", id, approved);
        Self::get_by_id(pool, id).await
    }

    /// Add one vote
    /// DOCUMENTATION: The increment happens in SQL so concurrent votes are not lost
    pub async fn add_vote(pool: &PgPool, id: Uuid) -> Result<Photo, BoroughsError> {
        let result = sqlx::query("UPDATE photos SET votes = votes + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("photo {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(BoroughsError::NotFound(format!("photo {}", id)));
        }

        Self::get_by_id(pool, id).await
    }

    pub async fn delete_photo(pool: &PgPool, id: Uuid) -> Result<(), BoroughsError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("photo {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(BoroughsError::NotFound(format!("photo {}", id)));
        }

        log::info!("Deleted photo {}", id);
        Ok(())
    }
}
