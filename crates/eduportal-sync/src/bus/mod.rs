//! Cross-context broadcast bus.

pub mod bus;
pub mod registry;
pub mod subscription;
pub mod transport;

pub use bus::SyncBus;
pub use registry::Topic;
pub use subscription::SubscriptionHandle;
pub use transport::{MemoryTransport, NoopTransport, Transport, WireFrame};
