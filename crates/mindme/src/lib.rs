//! Top-level facade crate for MindMe extensions.
//!
//! Re-exports the payload model and the service shell so extension authors can
//! depend on a single crate.

pub mod core {
    pub use mindme_core::*;
}

pub mod service {
    pub use mindme_service::*;
}
