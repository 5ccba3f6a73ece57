//! Configuration handling for the wizards

use crate::state::{EmailCheck, DEFAULT_TAX_RATE};
use anyhow::Result;
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration; every field falls back to a built-in default
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WizardConfig {
    /// VAT rate applied to offer prices (0.19 = 19%)
    pub tax_rate: Option<Decimal>,
    /// Check email shape, not just presence
    pub strict_email: Option<bool>,
    /// Keep partnership drafts after a successful submission
    pub keep_draft_after_submit: Option<bool>,
    /// File that receives submissions as JSON lines
    pub outbox_path: Option<PathBuf>,
    /// Directory for saved drafts
    pub draft_dir: Option<PathBuf>,
}

impl WizardConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "lead-wizard", "lead-wizard")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: WizardConfig = serde_json::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded config");
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate.unwrap_or(DEFAULT_TAX_RATE)
    }

    pub fn email_check(&self) -> EmailCheck {
        if self.strict_email.unwrap_or(true) {
            EmailCheck::Format
        } else {
            EmailCheck::Presence
        }
    }

    pub fn clear_draft_on_submit(&self) -> bool {
        !self.keep_draft_after_submit.unwrap_or(false)
    }

    /// Outbox location: `LEAD_WIZARD_OUTBOX`, then config, then the data dir
    pub fn outbox_path(&self) -> Option<PathBuf> {
        std::env::var_os("LEAD_WIZARD_OUTBOX")
            .map(PathBuf::from)
            .or_else(|| self.outbox_path.clone())
            .or_else(|| {
                ProjectDirs::from("io", "lead-wizard", "lead-wizard")
                    .map(|dirs| dirs.data_dir().join("outbox.jsonl"))
            })
    }
}
