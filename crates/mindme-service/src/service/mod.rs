//! Extension service shell.
//!
//! `ExtensionService` owns the lifecycle; `ExtensionBinder` is the surface the
//! host calls through; `ExtensionContext` is what extension code uses to
//! publish.

pub mod context;
pub mod extension;
pub mod shell;

pub use context::ExtensionContext;
pub use extension::Extension;
pub use shell::{ExtensionBinder, ExtensionService};
