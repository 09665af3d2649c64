//! Extension config loader (strict parsing).

pub mod schema;

use std::fs;

use mindme_core::error::{ExtensionError, Result};

pub use schema::{ExtensionMetadata, ServiceConfig, SettingsEntry, TrustConfig};

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExtensionError::InvalidConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| ExtensionError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
