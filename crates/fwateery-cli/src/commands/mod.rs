//! CLI subcommands and the context they share.

pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod scan;
pub mod show;

use std::path::{Path, PathBuf};

use tracing::debug;

use fwateery_core::models::config::FwateeryConfig;
use fwateery_core::{InvoiceStore, Language};

/// Resolved settings for one invocation.
pub struct Context {
    pub config: FwateeryConfig,
    pub language: Language,
    pub user: String,
    pub data_dir: PathBuf,
}

impl Context {
    /// Load the config file and apply command-line overrides.
    pub fn load(
        config_path: Option<&Path>,
        lang: Option<&str>,
        user: Option<&str>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = config::load_config(config_path)?;

        let language = match lang {
            Some(code) => Language::from_code(code)
                .ok_or_else(|| anyhow::anyhow!("Unsupported language: {} (expected ar or en)", code))?,
            None => config.general.language,
        };

        let user = user
            .map(str::to_string)
            .unwrap_or_else(|| config.general.user.clone());

        let data_dir = data_dir
            .or_else(|| config.store.data_dir.clone())
            .unwrap_or_else(default_data_dir);

        debug!("Using user {} in {} ({})", user, data_dir.display(), language);

        Ok(Self {
            config,
            language,
            user,
            data_dir,
        })
    }

    /// Open the active user's invoice store.
    pub fn open_store(&self) -> anyhow::Result<InvoiceStore> {
        Ok(InvoiceStore::open(&self.data_dir, &self.user, self.language)?)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fwateery")
}
