//! MindMe core: extension payload model, its wire encodings, and the shared
//! error surface.
//!
//! This crate defines the data contract between an extension and its host. It
//! carries no runtime or transport dependencies so the same types can be used
//! on both sides of the connection.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every decoder
//! reports malformed input as `ExtensionError` so a bad payload from a peer
//! never brings the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ExtensionError, Result};
pub use protocol::data::ExtensionData;
