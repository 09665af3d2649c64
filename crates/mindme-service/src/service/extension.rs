use async_trait::async_trait;

use mindme_core::protocol::UpdateReason;

use super::context::ExtensionContext;

/// Extension logic plugged into an `ExtensionService`.
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    /// Short name used for the worker thread and in logs.
    fn name(&self) -> &'static str;

    /// Called once, on the first accepted handshake, before any update.
    /// `is_reconnect` is true when the host is re-establishing a dropped
    /// connection. Runs on the binding thread; keep it short.
    fn on_initialize(&self, _ctx: &ExtensionContext, _is_reconnect: bool) {}

    /// The host wants fresh data. Runs on the extension's worker thread, one
    /// call at a time. Publishing is optional; doing nothing keeps the data
    /// the host already has.
    async fn on_update_data(&self, ctx: &ExtensionContext, reason: UpdateReason);
}
