//! State-slot providers implementing
//! [`StateStore`](eduportal_core::traits::state::StateStore).

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStateStore;
