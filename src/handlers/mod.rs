// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod health;
pub mod media;
pub mod multipart;
pub mod pages;
pub mod photos;
pub mod uploads;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::config as admin_config;
pub use health::config as health_config;
pub use media::config as media_config;
pub use pages::config as pages_config;
pub use pages::details_config;
pub use photos::config as photos_config;
pub use uploads::config as uploads_config;
