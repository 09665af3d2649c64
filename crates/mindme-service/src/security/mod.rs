//! Caller identity checks.
//!
//! Compiles the configured certificate allowlist into a lookup set and
//! verifies binding callers against it before any data is exchanged.

pub mod signature;
pub mod verifier;

pub use signature::{Signature, TrustedSignatures};
pub use verifier::{CallerVerifier, Rejection};
