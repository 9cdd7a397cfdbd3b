//! Core type definitions used across the EduPortal workspace.

pub mod id;

pub use id::*;
