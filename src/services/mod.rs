// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod borough_service;
pub mod photo_service;

pub use borough_service::BoroughService;
pub use photo_service::PhotoService;
