//! MindMe extension service shell.
//!
//! Wires configuration, caller verification, the sequential update worker and
//! the host callback into the `ExtensionService` an extension author embeds.
//! The binary (`main.rs`) runs a sample extension against an in-process host.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod dispatch;
pub mod host;
pub mod obs;
pub mod platform;
pub mod security;
pub mod service;

pub use host::{ChannelHost, ExtensionHost, HostReceiver};
pub use platform::{InMemoryPackageManager, PackageManager};
pub use security::{CallerVerifier, Signature, TrustedSignatures};
pub use service::{Extension, ExtensionBinder, ExtensionContext, ExtensionService};
