//! Dispatch module exports.
//!
//! Re-exports the sequential worker so the service shell and tests can depend
//! on this module directly.

pub mod worker;

pub use worker::SerialWorker;
