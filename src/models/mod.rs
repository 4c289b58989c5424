// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod borough;
pub mod lifecycle;
pub mod photo;
pub mod user;

pub use borough::*;
pub use lifecycle::*;
pub use photo::*;
pub use user::*;
