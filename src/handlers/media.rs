// src/handlers/media.rs
// DOCUMENTATION: Development-only serving of uploaded media
// PURPOSE: Expose MEDIA_ROOT under MEDIA_URL when DEBUG is on

use actix_files::Files;
use actix_web::web;

use crate::config::MediaSettings;

/// Route configuration for public media.
/// Registers nothing unless `media.debug` is set; private media is never mounted.
pub fn config(media: MediaSettings) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        if !media.debug {
            return;
        }
        let mount = media.media_url.trim_end_matches('/').to_string();
        cfg.service(Files::new(&mount, media.media_root));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{pages_config, details_config};
    use actix_web::{http::StatusCode, test, App};
    use tempfile::TempDir;

    fn settings(root: &TempDir, debug: bool) -> MediaSettings {
        MediaSettings {
            debug,
            media_root: root.path().to_path_buf(),
            ..MediaSettings::default()
        }
    }

    async fn write_photo(root: &TempDir) {
        tokio::fs::create_dir_all(root.path().join("photos")).await.unwrap();
        tokio::fs::write(root.path().join("photos/bay.txt"), b"bay view")
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn test_serves_media_in_debug() {
        let root = TempDir::new().unwrap();
        write_photo(&root).await;

        let app = test::init_service(App::new().configure(config(settings(&root, true)))).await;

        let req = test::TestRequest::get().uri("/media/photos/bay.txt").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"bay view");
    }

    #[actix_web::test]
    async fn test_no_media_route_without_debug() {
        let root = TempDir::new().unwrap();
        write_photo(&root).await;

        let app = test::init_service(
            App::new()
                .configure(config(settings(&root, false)))
                .configure(pages_config)
                .configure(details_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/media/photos/bay.txt").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_static_pages_alongside_media() {
        let root = TempDir::new().unwrap();

        let app = test::init_service(
            App::new()
                .configure(config(settings(&root, true)))
                .configure(pages_config)
                .configure(details_config),
        )
        .await;

        for uri in ["/About/", "/success"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }
    }
}
