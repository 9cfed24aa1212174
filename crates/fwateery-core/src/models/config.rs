//! Configuration structures for invoice capture.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::language::Language;
use crate::error::{FwateeryError, Result};

/// Upload limit for a single invoice image (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Main configuration for fwateery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FwateeryConfig {
    /// Language and identity settings.
    pub general: GeneralConfig,

    /// Invoice store settings.
    pub store: StoreConfig,

    /// Image scanning settings.
    pub scan: ScanConfig,
}

/// Language and active user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language for placeholders, weekday names and messages.
    pub language: Language,

    /// Identity whose invoice store is used.
    pub user: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: Language::Ar,
            user: "default".to_string(),
        }
    }
}

/// Invoice store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per user. Unset means the
    /// platform data directory chosen by the front end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Image scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Keep the source image on each record as a data URL.
    pub attach_images: bool,

    /// Reject images larger than this many bytes.
    pub max_image_bytes: u64,

    /// Extension of the saved model response next to each image.
    pub response_extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            attach_images: true,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            response_extension: "json".to_string(),
        }
    }
}

impl FwateeryConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FwateeryError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FwateeryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
