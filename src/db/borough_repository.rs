// src/db/borough_repository.rs
// DOCUMENTATION: Borough database operations
// PURPOSE: Persist boroughs whose derived fields were computed by the model layer

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::BoroughsError;
use crate::models::{Borough, ImageSlot, NewBorough};

pub struct BoroughRepository;

impl BoroughRepository {
    /// Insert a prepared borough
    /// DOCUMENTATION: Title and slug collisions surface as AlreadyExists,
    /// an unknown author as a validation error
    pub async fn create_borough(pool: &PgPool, new: &NewBorough) -> Result<Borough, BoroughsError> {
        let borough = sqlx::query_as::<_, Borough>(
            r#"
            INSERT INTO boroughs (
                id, title, author_id, slug, created_at, modified_at,
                zipcode, tract, content, sources
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(&new.title)
        .bind(new.author_id)
        .bind(&new.slug)
        .bind(new.created_at)
        .bind(new.modified_at)
        .bind(new.zipcode)
        .bind(&new.tract)
        .bind(&new.content)
        .bind(&new.sources)
        .fetch_one(pool)
        .await
        .map_err(|e| match BoroughsError::from_sqlx(e, &format!("borough '{}'", new.title)) {
            BoroughsError::Protected(_) => {
                BoroughsError::ValidationError(format!("author: unknown user {}", new.author_id))
            }
            other => other,
        })?;

        log::info!("Created borough '{}' at /{}/", borough.title, borough.slug);
        Ok(borough)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Borough, BoroughsError> {
        sqlx::query_as::<_, Borough>("SELECT * FROM boroughs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("borough {}", id)))?
            .ok_or_else(|| {
                log::warn!("Borough not found: {}", id);
                BoroughsError::NotFound(format!("borough {}", id))
            })
    }

    pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Borough, BoroughsError> {
        sqlx::query_as::<_, Borough>("SELECT * FROM boroughs WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("borough '{}'", slug)))?
            .ok_or_else(|| {
                log::warn!("Borough not found with slug: {}", slug);
                BoroughsError::NotFound(format!("borough '{}'", slug))
            })
    }

    /// Newest boroughs first
    pub async fn list_boroughs(pool: &PgPool, limit: i64) -> Result<Vec<Borough>, BoroughsError> {
        sqlx::query_as::<_, Borough>(
            r#"
            SELECT * FROM boroughs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| BoroughsError::from_sqlx(e, "boroughs"))
    }

    /// Save every editable column of an already-updated borough
    /// DOCUMENTATION: Callers run Borough::apply_update / touch first so the
    /// slug and modified timestamp are current
    pub async fn update_borough(pool: &PgPool, borough: &Borough) -> Result<Borough, BoroughsError> {
        let updated = sqlx::query_as::<_, Borough>(
            r#"
            UPDATE boroughs
            SET title = $2,
                author_id = $3,
                slug = $4,
                modified_at = $5,
                zipcode = $6,
                tract = $7,
                content = $8,
                sources = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(borough.id)
        .bind(&borough.title)
        .bind(borough.author_id)
        .bind(&borough.slug)
        .bind(borough.modified_at)
        .bind(borough.zipcode)
        .bind(&borough.tract)
        .bind(&borough.content)
        .bind(&borough.sources)
        .fetch_optional(pool)
        .await
        .map_err(|e| match BoroughsError::from_sqlx(e, &format!("borough '{}'", borough.title)) {
            BoroughsError::Protected(_) => BoroughsError::ValidationError(format!(
                "author: unknown user {}",
                borough.author_id
            )),
            other => other,
        })?
        .ok_or_else(|| BoroughsError::NotFound(format!("borough {}", borough.id)))?;

        log::info!("Updated borough {} (slug: {})", updated.id, updated.slug);
        Ok(updated)
    }

    /// Record the stored name of an image slot
    pub async fn set_image(
        pool: &PgPool,
        borough: &Borough,
        slot: ImageSlot,
    ) -> Result<Borough, BoroughsError> {
        // Column names come from a closed enum, never from input
        let sql = format!(
            "UPDATE boroughs SET {} = $2, slug = $3, modified_at = $4 WHERE id = $1 RETURNING *",
            slot.column()
        );

        sqlx::query_as::<_, Borough>(&sql)
            .bind(borough.id)
            .bind(borough.image(slot))
            .bind(&borough.slug)
            .bind(borough.modified_at)
            .fetch_optional(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("borough {}", borough.id)))?
            .ok_or_else(|| BoroughsError::NotFound(format!("borough {}", borough.id)))
    }

    /// Delete a borough
    /// DOCUMENTATION: Fails with Protected while photos reference it
    pub async fn delete_borough(pool: &PgPool, id: Uuid) -> Result<(), BoroughsError> {
        let result = sqlx::query("DELETE FROM boroughs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("borough {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(BoroughsError::NotFound(format!("borough {}", id)));
        }

        log::info!("Deleted borough {}", id);
        Ok(())
    }
}
