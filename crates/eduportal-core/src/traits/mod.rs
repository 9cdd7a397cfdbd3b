//! Core traits defined in `eduportal-core` and implemented by other crates.

pub mod state;

pub use state::StateStore;
