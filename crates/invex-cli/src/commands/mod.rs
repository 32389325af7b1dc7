//! Subcommands and the helpers they share.

pub mod config;
pub mod process;
pub mod report;
pub mod watch;

use std::path::{Path, PathBuf};

use tracing::debug;

use invex_core::models::config::InvexConfig;
use invex_core::{Categorizer, DocumentTextSource, InvoiceAssembler, InvoicePipeline};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

/// The file named by `--config`, else the default path.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, else the default path when it exists,
/// else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        debug!("Loading config from {}", path.display());
        return Ok(InvexConfig::from_file(path)?);
    }

    let default = default_config_path();
    if default.exists() {
        debug!("Loading config from {}", default.display());
        Ok(InvexConfig::from_file(&default)?)
    } else {
        Ok(InvexConfig::default())
    }
}

/// Build the full pipeline described by `config`.
pub fn build_pipeline(config: &InvexConfig) -> InvoicePipeline {
    let source = DocumentTextSource::from_config(&config.ocr);
    let assembler = InvoiceAssembler::new(Categorizer::new(&config.categories));

    InvoicePipeline::new(
        Box::new(source),
        invex_core::open_store(&config.store),
        assembler,
        config.directories.clone(),
    )
    .with_notifier(invex_core::notifier_from_config(&config.notify))
}
