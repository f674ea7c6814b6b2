//! Application configuration: optional JSON file plus command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use subhub_ingest::{WebhookConfig, load_json};
use subhub_persistence::DraftStoreConfig;

/// Settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub webhook: WebhookConfig,
    pub drafts: DraftStoreConfig,
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub webhook_url: Option<String>,
    pub drafts_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read the config file, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: Self = load_json(path)
            .with_context(|| format!("load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.webhook_url {
            self.webhook.base_url = url;
        }
        if let Some(path) = overrides.drafts_path {
            self.drafts.path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_is_default() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.drafts.expiry_hours, 24);
    }

    #[test]
    fn test_flags_win() {
        let mut config = AppConfig::default();
        config.webhook.base_url = "http://from-file".to_string();
        let config = config.with_overrides(ConfigOverrides {
            webhook_url: Some("http://from-flag".to_string()),
            drafts_path: None,
        });
        assert_eq!(config.webhook.base_url, "http://from-flag");
        assert_eq!(config.drafts, DraftStoreConfig::default());
    }
}
