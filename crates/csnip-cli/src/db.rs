//! Store construction for the CLI

use crate::Context;
use anyhow::{Context as _, Result};
use csnip_core::{config, BuiltinLanguages};
use std::path::PathBuf;

/// Load configuration, apply the `--database` override and open the store.
pub fn open_context(database: Option<PathBuf>) -> Result<Context> {
    let mut config = config::load_config().context("Failed to load configuration")?;
    if let Some(path) = database {
        config.database_path = Some(path);
    }

    let path = config.database_path()?;
    log::debug!("Using snippet database at {}", path.display());
    let store = csnip_core::open_store(&path)
        .with_context(|| format!("Failed to open snippet database at {}", path.display()))?;

    Ok(Context {
        store,
        languages: Box::new(BuiltinLanguages),
        config,
    })
}
