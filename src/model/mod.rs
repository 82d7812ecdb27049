pub mod config {
    pub use ameba_core::config::*;
}
pub mod spatial_hash {
    pub use ameba_core::spatial_hash::*;
}
pub mod lifecycle {
    pub use ameba_core::lifecycle::*;
}
pub mod mutation {
    pub use ameba_core::mutation::*;
}
pub mod history {
    pub use ameba_core::history::*;
}
pub mod metrics {
    pub use ameba_core::metrics::*;
}
pub mod snapshot {
    pub use ameba_core::snapshot::*;
}
pub mod systems {
    pub use ameba_core::systems::*;
}
pub mod state {
    pub use ameba_data::*;
}

pub mod world;
