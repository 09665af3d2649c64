use std::sync::{Arc, PoisonError, RwLock};

use mindme_core::ExtensionData;

use crate::host::ExtensionHost;
use crate::obs::ServiceMetrics;

/// Shared slot holding the most recently accepted host handle.
#[derive(Clone, Default)]
pub(crate) struct HostSlot {
    inner: Arc<RwLock<Option<Arc<dyn ExtensionHost>>>>,
}

impl HostSlot {
    pub(crate) fn set(&self, host: Option<Arc<dyn ExtensionHost>>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = host;
    }

    pub(crate) fn get(&self) -> Option<Arc<dyn ExtensionHost>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Handle extension code uses to talk back to the host.
#[derive(Clone)]
pub struct ExtensionContext {
    name: &'static str,
    host: HostSlot,
    metrics: Arc<ServiceMetrics>,
}

impl ExtensionContext {
    pub(crate) fn new(name: &'static str, host: HostSlot, metrics: Arc<ServiceMetrics>) -> Self {
        Self { name, host, metrics }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Push data to the host, or `None` to clear and hide the extension.
    ///
    /// Text fields are truncated to their caps first. Delivery is best
    /// effort: a missing or dead host is logged and otherwise ignored.
    pub fn publish_update(&self, data: Option<ExtensionData>) {
        let Some(host) = self.host.get() else {
            tracing::warn!(extension = self.name, "no host connected; update dropped");
            self.metrics.publishes.inc(&[("outcome", "no_host")]);
            return;
        };

        let data = data.map(ExtensionData::cleaned);
        match host.publish_update(data.as_ref()) {
            Ok(()) => {
                let outcome = if data.is_some() { "delivered" } else { "cleared" };
                tracing::debug!(extension = self.name, outcome, "published extension data");
                self.metrics.publishes.inc(&[("outcome", outcome)]);
            }
            Err(e) => {
                tracing::warn!(extension = self.name, error = %e, "couldn't publish updated extension data");
                self.metrics.publishes.inc(&[("outcome", "failed")]);
            }
        }
    }
}
