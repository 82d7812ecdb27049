pub mod service;
pub mod shutdown;

pub use service::{ServiceError, ServiceOptions, WorldHandle, WorldService};
pub use shutdown::ShutdownManager;
