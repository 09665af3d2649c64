use serde::Deserialize;

use mindme_core::error::{ExtensionError, Result};
use mindme_core::protocol::contract::{EXTRA_FROM_MINDME_SETTINGS, PROTOCOL_VERSION_WORLD_READABILITY};

use crate::security::TrustedSignatures;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    pub extension: ExtensionMetadata,

    #[serde(default)]
    pub trust: TrustConfig,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ExtensionError::InvalidConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.extension.validate()?;
        self.trust.compile()?;

        Ok(())
    }
}

/// Attributes an extension declares alongside its registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionMetadata {
    pub protocol_version: u32,

    pub description: String,

    #[serde(default)]
    pub settings_activity: Option<String>,

    #[serde(default)]
    pub world_readable: bool,
}

impl ExtensionMetadata {
    pub fn validate(&self) -> Result<()> {
        if self.protocol_version < 1 {
            return Err(ExtensionError::InvalidConfig(
                "extension.protocol_version must be at least 1".into(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(ExtensionError::InvalidConfig(
                "extension.description must not be empty".into(),
            ));
        }
        if matches!(&self.settings_activity, Some(s) if s.trim().is_empty()) {
            return Err(ExtensionError::InvalidConfig(
                "extension.settings_activity must not be empty when set".into(),
            ));
        }
        Ok(())
    }

    /// `world_readable` only counts from the protocol version that introduced it.
    pub fn is_world_readable(&self) -> bool {
        self.protocol_version >= PROTOCOL_VERSION_WORLD_READABILITY && self.world_readable
    }

    pub fn settings_entry(&self) -> Option<SettingsEntry> {
        self.settings_activity.as_ref().map(|component| SettingsEntry {
            component: component.clone(),
        })
    }
}

/// Settings screen the host may offer for this extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEntry {
    pub component: String,
}

impl SettingsEntry {
    /// Extras the host sets when launching from its own settings UI.
    pub fn launch_extras(&self) -> [(&'static str, bool); 1] {
        [(EXTRA_FROM_MINDME_SETTINGS, true)]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    /// Hex-encoded signing certificates of trusted hosts.
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl TrustConfig {
    pub fn compile(&self) -> Result<TrustedSignatures> {
        TrustedSignatures::compile(&self.signatures)
    }
}
