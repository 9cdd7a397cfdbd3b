//! # eduportal-core
//!
//! Core crate for EduPortal Sync. Contains configuration schemas, typed
//! identifiers, the persisted-state trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other EduPortal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
