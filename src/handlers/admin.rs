// src/handlers/admin.rs
// DOCUMENTATION: Author and moderation endpoints
// PURPOSE: Manage users, boroughs and photo approval behind the admin token

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::multipart::read_form;
use crate::config::Config;
use crate::db::{PhotoRepository, UserRepository};
use crate::errors::BoroughsError;
use crate::models::{CreateBoroughRequest, CreateUserRequest, ImageSlot, UpdateBoroughRequest};
use crate::services::{BoroughService, PhotoService};
use crate::storage::{StorageBackends, Visibility};

/// Request body for the moderation endpoint
#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    #[serde(default = "approve_by_default")]
    pub approved: bool,
}

fn approve_by_default() -> bool {
    true
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), BoroughsError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            BoroughsError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(BoroughsError::Forbidden);
    }

    Ok(())
}

/// POST /admin/users
pub async fn create_user(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;
    body.validate()?;

    let user = UserRepository::create_user(pool.get_ref(), &body, Utc::now()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// GET /admin/users
pub async fn list_users(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let users = UserRepository::list_users(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /admin/users/{id}
/// Refused with 409 while the user still authors boroughs
pub async fn delete_user(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    UserRepository::delete_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/boroughs
pub async fn create_borough(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    body: web::Json<CreateBoroughRequest>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let borough =
        BoroughService::create_borough(pool.get_ref(), &config.boroughs, body.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((actix_web::http::header::LOCATION, borough.to_summary().url))
        .json(borough.to_response(storage.get(Visibility::Public).as_ref())))
}

/// PUT /admin/boroughs/{id}
pub async fn update_borough(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBoroughRequest>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let borough = BoroughService::update_borough(
        pool.get_ref(),
        &config.boroughs,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(borough.to_response(storage.get(Visibility::Public).as_ref())))
}

/// DELETE /admin/boroughs/{id}
/// Refused with 409 while photos reference the borough
pub async fn delete_borough(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    BoroughService::delete_borough(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/boroughs/{id}/images/{slot}
/// Multipart upload with a single "image" file field
pub async fn upload_borough_image(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    path: web::Path<(Uuid, String)>,
    payload: Multipart,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let (id, slot) = path.into_inner();
    let slot: ImageSlot = slot.parse()?;

    let mut form = read_form(payload, config.media.upload_max_bytes).await?;
    let image = form.take_file("image")?;

    let public = storage.get(Visibility::Public).as_ref();
    let borough =
        BoroughService::upload_image(pool.get_ref(), public, &config.boroughs, id, slot, image)
            .await?;
    Ok(HttpResponse::Ok().json(borough.to_response(public)))
}

/// GET /admin/boroughs/{id}/photos
/// Every photo of a borough, including those awaiting approval
pub async fn borough_photos(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let photos =
        PhotoRepository::get_photos_by_borough(pool.get_ref(), path.into_inner(), false).await?;
    let now = Utc::now();
    let public = storage.get(Visibility::Public).as_ref();
    Ok(HttpResponse::Ok().json(
        photos
            .iter()
            .map(|p| p.to_response(public, now))
            .collect::<Vec<_>>(),
    ))
}

/// POST /admin/photos/{id}/approve
pub async fn moderate_photo(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ModerationRequest>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    let photo = PhotoService::set_approved(pool.get_ref(), path.into_inner(), body.approved).await?;
    Ok(HttpResponse::Ok().json(photo.to_response(storage.get(Visibility::Public).as_ref(), Utc::now())))
}

/// DELETE /admin/photos/{id}
pub async fn delete_photo(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<StorageBackends>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, BoroughsError> {
    verify_admin_token(&req, &config)?;

    PhotoService::delete_photo(pool.get_ref(), storage.get(Visibility::Public).as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::post().to(create_user))
            .route("/users", web::get().to(list_users))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/boroughs", web::post().to(create_borough))
            .route("/boroughs/{id}", web::put().to(update_borough))
            .route("/boroughs/{id}", web::delete().to(delete_borough))
            .route("/boroughs/{id}/photos", web::get().to(borough_photos))
            .route("/boroughs/{id}/images/{slot}", web::post().to(upload_borough_image))
            .route("/photos/{id}/approve", web::post().to(moderate_photo))
            .route("/photos/{id}", web::delete().to(delete_photo)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::lazy_pool;
    use crate::handlers::testing;
    use actix_web::{http::StatusCode, test, App};
    use tempfile::TempDir;

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let cfg = testing::config(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(StorageBackends::from_settings(&cfg.media)))
                .app_data(web::Data::new(cfg))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_wrong_token_is_forbidden() {
        let dir = TempDir::new().unwrap();
        let cfg = testing::config(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(StorageBackends::from_settings(&cfg.media)))
                .app_data(web::Data::new(cfg))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/admin/users/{}", Uuid::new_v4()))
            .insert_header(("X-Admin-Token", "guess"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_moderation_defaults_to_approve() {
        let body: ModerationRequest = serde_json::from_str("{}").unwrap();
        assert!(body.approved);

        let body: ModerationRequest = serde_json::from_str(r#"{"approved": false}"#).unwrap();
        assert!(!body.approved);
    }
}
