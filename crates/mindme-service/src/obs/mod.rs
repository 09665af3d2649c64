//! Lightweight in-process metrics.
//!
//! Counters are stored as atomics keyed by label set and rendered in the
//! Prometheus text format on demand.

pub mod metrics;

pub use metrics::{CounterVec, ServiceMetrics};
