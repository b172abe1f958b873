//! csnip Core Library
//!
//! This crate provides the core functionality for the csnip snippet manager:
//! the versioned snippet store, its SQLite and in-memory backends, data
//! models, language normalisation and configuration.

pub mod config;
pub mod database;
pub mod error;
pub mod language;
pub mod models;
pub mod schema;
pub mod seed;
pub mod storage;

// Re-export commonly used types
pub use config::{load_config, Config};
pub use database::{create_connection_pool, create_test_pool, DbPool};
pub use error::{Error, Result};
pub use language::{BuiltinLanguages, Language, LanguageNormalizer};
pub use models::{Snippet, SnippetDraft};
pub use storage::{InMemoryStore, SnippetStore, SqliteStore};
pub use uuid::Uuid;

use std::path::Path;

/// Open the SQLite store at `path`, or an in-memory store for `":memory:"`.
pub fn open_store(path: &Path) -> Result<Box<dyn SnippetStore>> {
    if path.as_os_str() == ":memory:" {
        return Ok(Box::new(InMemoryStore::new()));
    }
    Ok(Box::new(SqliteStore::open(path)?))
}
