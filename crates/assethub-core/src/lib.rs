//! # assethub-core
//!
//! Core crate for the AssetHub explorer. Contains configuration schemas,
//! typed identifiers, sort types, explorer events, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other AssetHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
