// src/handlers/pages.rs
// DOCUMENTATION: Public pages
// PURPOSE: Index, about, post-upload confirmation and borough details

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::errors::BoroughsError;
use crate::models::{BoroughResponse, BoroughSummary, PhotoResponse};
use crate::services::{BoroughService, PhotoService};
use crate::storage::{StorageBackends, Visibility};

/// Index page payload
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub boroughs: Vec<BoroughSummary>,
    pub recent_photos: Vec<PhotoResponse>,
}

/// Borough details page payload
#[derive(Debug, Serialize)]
pub struct BoroughDetailResponse {
    #[serde(flatten)]
    pub borough: BoroughResponse,
    pub photos: Vec<PhotoResponse>,
}

/// GET /
pub async fn index(
    pool: web::Data<PgPool>,
    storage: web::Data<StorageBackends>,
) -> Result<impl Responder, BoroughsError> {
    let now = Utc::now();
    let boroughs = BoroughService::list_boroughs(pool.get_ref()).await?;
    let recent = PhotoService::recent_photos(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(IndexResponse {
        boroughs: boroughs.iter().map(|b| b.to_summary()).collect(),
        recent_photos: recent
            .iter()
            .map(|p| p.to_response(storage.get(Visibility::Public).as_ref(), now))
            .collect(),
    }))
}

/// GET /About/
pub async fn about() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "title": "About Boroughs",
        "description": "Boroughs collects short articles about neighborhoods, \
                        each with photos submitted by the people who live there. \
                        Submitted photos appear once a moderator approves them.",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /success
pub async fn success() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Thank you! Your photo was received and will appear once it is approved."
    }))
}

/// GET /{slug}/
pub async fn borough_details(
    pool: web::Data<PgPool>,
    storage: web::Data<StorageBackends>,
    path: web::Path<String>,
) -> Result<impl Responder, BoroughsError> {
    let slug = path.into_inner();
    let (borough, photos) = BoroughService::get_details(pool.get_ref(), &slug).await?;

    let now = Utc::now();
    let public = storage.get(Visibility::Public).as_ref();
    Ok(HttpResponse::Ok().json(BoroughDetailResponse {
        borough: borough.to_response(public),
        photos: photos.iter().map(|p| p.to_response(public, now)).collect(),
    }))
}

/// Fixed pages
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/About/", web::get().to(about))
        .route("/success", web::get().to(success));
}

/// Borough pages by slug; matches any single path segment, so it is
/// registered after every other route
pub fn details_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/{slug}/", web::get().to(borough_details));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    // No pool is registered: a request that fell through to the slug
    // route would fail instead of answering with the fixed page.
    #[actix_web::test]
    async fn test_fixed_pages_win_over_slug_route() {
        let app = test::init_service(App::new().configure(config).configure(details_config)).await;

        let about: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/About/").to_request())
                .await;
        assert_eq!(about["title"], "About Boroughs");

        let success: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/success").to_request())
                .await;
        assert!(success["message"].as_str().unwrap().contains("approved"));
    }

    #[actix_web::test]
    async fn test_slug_route_needs_trailing_slash() {
        let app = test::init_service(App::new().configure(config).configure(details_config)).await;

        let req = test::TestRequest::get().uri("/noe-valley").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
