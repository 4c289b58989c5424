// src/handlers/testing.rs
// DOCUMENTATION: Shared helpers for handler tests
// PURPOSE: Test configuration and hand-built multipart bodies

use std::path::Path;

use crate::config::{BoroughSettings, Config, MediaSettings};

pub const ADMIN_TOKEN: &str = "s3cret";
pub const BOUNDARY: &str = "----boroughs-test-boundary";

/// Configuration whose media roots live under `media_root`
pub fn config(media_root: &Path) -> Config {
    Config {
        database_url: "postgresql://localhost/boroughs".to_string(),
        server_address: "127.0.0.1".to_string(),
        server_port: 8000,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        admin_token: ADMIN_TOKEN.to_string(),
        db_max_connections: 1,
        db_connection_timeout: 1,
        boroughs: BoroughSettings::default(),
        media: MediaSettings {
            media_root: media_root.join("public"),
            private_media_root: media_root.join("private"),
            ..MediaSettings::default()
        },
    }
}

/// multipart/form-data body with text `fields` and an optional `(name, filename, data)` file
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> (&'static str, String) {
    (
        "content-type",
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}
