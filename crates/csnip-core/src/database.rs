//! Database connection management

use crate::error::{Error, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Migrations compiled into the binary; the applied set is the schema version.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "csnip.db";

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type ConnectionManagerType = ConnectionManager<SqliteConnection>;

/// A pooled SQLite connection
pub type PooledConn = PooledConnection<ConnectionManagerType>;

/// Per-connection pragmas, applied every time the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            BUSY_TIMEOUT.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// A wrapper around the connection pool that can be cloned and shared between threads
#[derive(Clone, Debug)]
pub struct DbPool(Arc<Pool<ConnectionManagerType>>);

impl DbPool {
    /// Create a new connection pool
    pub fn new(database_url: &str, max_size: u32) -> Result<Self> {
        let manager = ConnectionManagerType::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;

        Ok(Self(Arc::new(pool)))
    }

    /// Get a connection from the pool
    pub fn get(&self) -> Result<PooledConn> {
        Ok(self.0.get()?)
    }
}

/// Get the default database path in the user's data directory
pub fn default_db_path() -> Result<PathBuf> {
    let data = dirs::data_dir().ok_or_else(|| Error::other("Could not determine data directory"))?;
    Ok(data.join("csnip").join(DEFAULT_DB_FILENAME))
}

/// Validate that the database path is safe to use, creating its directory
fn validate_db_path(path: &Path) -> Result<()> {
    if path.file_name().and_then(OsStr::to_str).map_or(true, str::is_empty) {
        return Err(Error::validation(format!(
            "Invalid database filename: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::other(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        } else if !parent.is_dir() {
            return Err(Error::validation(format!(
                "Database parent is not a directory: {}",
                parent.display()
            )));
        }
    }

    Ok(())
}

/// Apply any embedded migrations the database has not seen yet
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;
    if !applied.is_empty() {
        log::info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

/// Open (or create) the database file at `path` and bring its schema up to date
pub fn create_connection_pool(path: &Path) -> Result<DbPool> {
    validate_db_path(path)?;

    let url = path
        .to_str()
        .ok_or_else(|| Error::validation("Database path is not valid UTF-8"))?;
    let pool = DbPool::new(url, 8)?;

    {
        let mut conn = pool.get()?;
        // Readers keep going while the single writer commits.
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        run_migrations(&mut conn)?;
    }

    log::debug!("Opened snippet database at {}", path.display());
    Ok(pool)
}

/// Create a private in-memory database with the schema applied.
///
/// The pool holds exactly one connection, since every `:memory:` connection
/// is a separate database.
pub fn create_test_pool() -> Result<DbPool> {
    let pool = DbPool::new(":memory:", 1)?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;

    #[test]
    fn test_connection_pool() -> Result<()> {
        let pool = create_test_pool()?;

        let mut conn = pool.get()?;
        let result: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
            .get_result(&mut *conn)?;
        assert_eq!(result, 1);

        Ok(())
    }

    #[test]
    fn test_file_pool_creates_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("snippets.db");

        let pool = create_connection_pool(&path)?;
        assert!(path.exists());

        // Re-opening an up-to-date database is a no-op migration-wise
        drop(pool);
        create_connection_pool(&path)?;
        Ok(())
    }

    #[test]
    fn test_rejects_directory_like_path() {
        assert!(validate_db_path(Path::new("/")).is_err());
    }
}
