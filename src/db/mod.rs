// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod borough_repository;
pub mod photo_repository;
pub mod user_repository;

pub use borough_repository::*;
pub use photo_repository::*;
pub use user_repository::*;
