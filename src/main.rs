// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, storage and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod storage;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use std::io;
use storage::StorageBackends;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize logging
    let config = Config::from_env();
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    // 3. Validate configuration
    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting boroughs...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool (runs migrations)
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Storage backends for uploads
    let storage = StorageBackends::from_settings(&config.media);
    log::info!(
        "Media root: {} (private: {})",
        config.media.media_root.display(),
        config.media.private_media_root.display()
    );
    if config.media.debug {
        log::info!("DEBUG on: serving media at {}", config.media.media_url);
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (database pool, config, and storage)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(storage.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes; the slug route matches any segment and goes last
            .configure(handlers::health_config)
            .configure(handlers::media_config(config_clone.media.clone()))
            .configure(handlers::admin_config)
            .configure(handlers::photos_config)
            .configure(handlers::uploads_config)
            .configure(handlers::pages_config)
            .configure(handlers::details_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
