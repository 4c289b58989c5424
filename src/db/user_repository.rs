// src/db/user_repository.rs
// DOCUMENTATION: Author account database operations
// PURPOSE: Create, look up and delete users referenced by boroughs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::BoroughsError;
use crate::models::{CreateUserRequest, User};

pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create_user(
        pool: &PgPool,
        req: &CreateUserRequest,
        now: DateTime<Utc>,
    ) -> Result<User, BoroughsError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.username.trim())
        .bind(req.email.as_deref().unwrap_or_default())
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| BoroughsError::from_sqlx(e, &format!("user '{}'", req.username)))?;

        log::info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<User, BoroughsError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("user {}", id)))?
            .ok_or_else(|| {
                log::warn!("User not found: {}", id);
                BoroughsError::NotFound(format!("user {}", id))
            })
    }

    pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, BoroughsError> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, "users"))
    }

    /// Delete a user
    /// DOCUMENTATION: Fails with Protected while any borough names them as author
    pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<(), BoroughsError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| BoroughsError::from_sqlx(e, &format!("user {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(BoroughsError::NotFound(format!("user {}", id)));
        }

        log::info!("Deleted user {}", id);
        Ok(())
    }
}
