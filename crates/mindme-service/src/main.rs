//! MindMe extension demo.
//!
//! Runs a sample weather extension against an in-process host:
//! - Load config (strict parsing + validate)
//! - Register a trusted host package, bind, handshake
//! - Request a periodic and a manual update, print what the host receives
//! - Tear down and dump metrics

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::{fmt, EnvFilter};

use mindme_core::error::{ExtensionError, Result};
use mindme_core::protocol::{contract, Locale, UpdateReason};
use mindme_core::ExtensionData;
use mindme_service::{
    config, host, CallerVerifier, Extension, ExtensionContext, ExtensionService,
    InMemoryPackageManager, Signature,
};

const HOST_UID: u32 = 10_042;
const HOST_PACKAGE: &str = "com.mindmeapp.alarmpad";

struct WeatherExtension;

#[async_trait]
impl Extension for WeatherExtension {
    fn name(&self) -> &'static str {
        "WeatherExtension"
    }

    fn on_initialize(&self, ctx: &ExtensionContext, is_reconnect: bool) {
        tracing::info!(extension = ctx.name(), is_reconnect, "weather extension ready");
    }

    async fn on_update_data(&self, ctx: &ExtensionContext, reason: UpdateReason) {
        let status = match reason {
            UpdateReason::Manual => "71°F",
            _ => "72°F",
        };
        let mut data = ExtensionData::new()
            .with_visible(true)
            .with_icon(7)
            .with_status_to_display(status)
            .with_status_to_speak(format!("It is {status} outside"));
        if let Some(locale) = Locale::new("en", Some("US")) {
            data = data.with_language_to_speak(locale);
        }
        ctx.publish_update(Some(data));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mindme-extension.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let trusted = cfg.trust.compile()?;

    let packages = Arc::new(InMemoryPackageManager::new());
    let host_sig = trusted
        .iter()
        .next()
        .cloned()
        .unwrap_or_else(|| Signature::new(Vec::new()));
    packages.install(HOST_UID, HOST_PACKAGE, vec![host_sig]);

    if let Some(entry) = cfg.extension.settings_entry() {
        tracing::info!(component = %entry.component, extras = ?entry.launch_extras(), "settings entry declared");
    }
    tracing::info!(
        action = contract::ACTION_EXTENSION,
        permission = contract::PERMISSION_READ_EXTENSION_DATA,
        description = %cfg.extension.description,
        "registering extension"
    );

    let verifier = CallerVerifier::new(trusted, packages);
    let service = ExtensionService::create(WeatherExtension, Ok(cfg.extension.clone()), verifier)?;
    let binder = service.on_bind();

    let (host, mut updates) = host::channel();
    binder.on_initialize(HOST_UID, Arc::new(host), false)?;
    binder.on_update(UpdateReason::Periodic.code())?;
    binder.on_update(UpdateReason::Manual.code())?;

    for _ in 0..2 {
        let received = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .map_err(|_| ExtensionError::Internal("timed out waiting for update".into()))?;
        match received {
            Some(Ok(Some(data))) => println!("{}", data.to_json_string()),
            Some(Ok(None)) => println!("(cleared)"),
            Some(Err(e)) => tracing::error!(error = %e, "host failed to decode update"),
            None => break,
        }
    }

    if let Some(worker) = service.destroy() {
        tokio::task::spawn_blocking(move || worker.join())
            .await
            .map_err(|e| ExtensionError::Internal(format!("join worker: {e}")))?
            .map_err(|_| ExtensionError::Internal("worker panicked".into()))?;
    }

    print!("{}", service.metrics().render());
    Ok(())
}
