//! Role model and the persisted current-role store.

pub mod model;
pub mod store;

pub use model::Role;
pub use store::RoleStore;
