// src/handlers/photos.rs
// DOCUMENTATION: Public photo actions
// PURPOSE: Voting on approved photos

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::BoroughsError;
use crate::services::PhotoService;
use crate::storage::{StorageBackends, Visibility};

/// POST /photos/{id}/vote
pub async fn vote(
    pool: web::Data<PgPool>,
    storage: web::Data<StorageBackends>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, BoroughsError> {
    let photo = PhotoService::vote(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photo.to_response(storage.get(Visibility::Public).as_ref(), Utc::now())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/photos/{id}/vote", web::post().to(vote));
}
