// src/handlers/uploads.rs
// DOCUMENTATION: Photo submission endpoint
// PURPOSE: Describe the upload form and accept multipart submissions

use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

use super::multipart::read_form;
use crate::config::Config;
use crate::errors::BoroughsError;
use crate::models::PhotoSubmission;
use crate::services::{BoroughService, PhotoService};
use crate::storage::{StorageBackends, Visibility};

/// GET /image_upload
/// Lists the form fields and the boroughs a photo can be attached to
pub async fn image_upload_form(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, BoroughsError> {
    let boroughs = BoroughService::list_boroughs(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "enctype": "multipart/form-data",
        "max_upload_bytes": config.media.upload_max_bytes,
        "fields": [
            { "name": "borough", "required": true },
            { "name": "image", "required": true, "type": "file" },
            { "name": "content", "required": false },
            { "name": "first_name", "required": true, "max_length": 35 },
            { "name": "last_name", "required": true, "max_length": 35 },
            { "name": "email", "required": true, "max_length": 200 }
        ],
        "boroughs": boroughs.iter().map(|b| b.to_summary()).collect::<Vec<_>>(),
    })))
}

/// POST /image_upload
/// Stores the photo (unapproved) and redirects to the success page
pub async fn image_upload(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    payload: Multipart,
) -> Result<impl Responder, BoroughsError> {
    let mut form = read_form(payload, config.media.upload_max_bytes).await?;

    let submission = PhotoSubmission::from_form(&form.fields)?;
    let image = form.take_file("image")?;

    let photo = PhotoService::submit_photo(
        pool.get_ref(),
        storage.get(Visibility::Public).as_ref(),
        submission,
        image,
    )
    .await?;

    log::info!("Photo {} submitted for {}", photo.id, photo.borough_slug);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/success"))
        .finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/image_upload")
            .route(web::get().to(image_upload_form))
            .route(web::post().to(image_upload)),
    );
}
