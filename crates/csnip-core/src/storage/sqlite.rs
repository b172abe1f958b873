//! SQLite backend implementation for csnip storage.

use super::{non_empty, page_offset, SnippetStore};
use crate::{
    database::{create_connection_pool, create_test_pool, DbPool},
    error::{Error, Result},
    models::{DbSnippet, NewDbSnippet, Snippet, SnippetDraft},
    schema::snippets,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Nullable, Text};
use diesel::sqlite::SqliteConnection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

diesel::define_sql_function! {
    /// SQLite `instr`: 1-based position of `needle` in `haystack`, 0 if absent.
    fn instr(haystack: Nullable<Text>, needle: Text) -> Nullable<Integer>;
}

/// A SQLite-backed storage implementation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
    /// Serialises updates within this process; SQLite's write lock covers
    /// other processes.
    write_lock: Arc<Mutex<()>>,
}

impl SqliteStore {
    /// Create a store over an existing, migrated pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(create_connection_pool(path)?))
    }

    /// A private in-memory store, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(create_test_pool()?))
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn load(&self, query: snippets::BoxedQuery<'_, diesel::sqlite::Sqlite>) -> Result<Vec<Snippet>> {
        let mut conn = self.pool.get()?;
        query
            .load::<DbSnippet>(&mut *conn)?
            .into_iter()
            .map(Snippet::try_from)
            .collect()
    }

    /// Current rows only, newest physical row first.
    fn current_rows<'a>() -> snippets::BoxedQuery<'a, diesel::sqlite::Sqlite> {
        snippets::table
            .filter(snippets::superseded_by.is_null())
            .order(snippets::id.desc())
            .into_boxed()
    }
}

/// The current row of a chain, highest version first if the chain is damaged.
fn find_current(conn: &mut SqliteConnection, key: &str) -> QueryResult<Option<DbSnippet>> {
    snippets::table
        .filter(snippets::uuid.eq(key))
        .filter(snippets::superseded_by.is_null())
        .order(snippets::version.desc())
        .select(DbSnippet::as_select())
        .first(conn)
        .optional()
}

impl SnippetStore for SqliteStore {
    fn create(&self, draft: SnippetDraft) -> Result<Snippet> {
        let external_id = Uuid::new_v4();
        let row = NewDbSnippet::from_draft(&draft, external_id, 1, Utc::now().naive_utc());

        let mut conn = self.pool.get()?;
        let inserted: DbSnippet = diesel::insert_into(snippets::table)
            .values(&row)
            .returning(DbSnippet::as_returning())
            .get_result(&mut *conn)?;

        let snippet = Snippet::try_from(inserted)?;
        log::debug!("Created snippet {} (row {})", snippet.external_id, snippet.row_id);
        Ok(snippet)
    }

    fn update(&self, external_id: &Uuid, draft: SnippetDraft) -> Result<Snippet> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::other("snippet write lock poisoned"))?;
        let mut conn = self.pool.get()?;
        let key = external_id.to_string();

        let result = conn.immediate_transaction::<_, Error, _>(|conn| {
            let previous = find_current(conn, &key)
                .map_err(|e| Error::transaction("lookup", e))?
                .ok_or(Error::NotFound(*external_id))?;
            let previous = Snippet::try_from(previous)?;

            let merged = draft.merge_onto(&previous);
            let row = NewDbSnippet::from_draft(
                &merged,
                previous.external_id,
                previous.version + 1,
                Utc::now().naive_utc(),
            );

            let inserted: DbSnippet = diesel::insert_into(snippets::table)
                .values(&row)
                .returning(DbSnippet::as_returning())
                .get_result(conn)
                .map_err(|e| Error::transaction("insert", e))?;

            diesel::update(snippets::table.find(previous.row_id))
                .set(snippets::superseded_by.eq(inserted.id))
                .execute(conn)
                .map_err(|e| Error::transaction("supersede", e))?;

            log::debug!(
                "Updated snippet {} to version {} (row {} supersedes {})",
                external_id,
                inserted.version,
                inserted.id,
                previous.row_id
            );
            Snippet::try_from(inserted)
        });

        // Anything still a bare database error came from BEGIN or COMMIT.
        result.map_err(|e| match e {
            Error::Database(source) => Error::transaction("commit", source),
            other => other,
        })
    }

    fn current(&self, external_id: &Uuid) -> Result<Snippet> {
        let mut conn = self.pool.get()?;
        find_current(&mut conn, &external_id.to_string())?
            .ok_or(Error::NotFound(*external_id))
            .and_then(Snippet::try_from)
    }

    fn history(&self, external_id: &Uuid) -> Result<Vec<Snippet>> {
        let query = snippets::table
            .filter(snippets::uuid.eq(external_id.to_string()))
            .order(snippets::version.desc())
            .into_boxed();
        let versions = self.load(query)?;
        if versions.is_empty() {
            return Err(Error::NotFound(*external_id));
        }
        Ok(versions)
    }

    fn list_current(&self, page: i64, page_size: i64) -> Result<Vec<Snippet>> {
        let offset = page_offset(page, page_size)?;
        non_empty(self.load(Self::current_rows().limit(page_size).offset(offset))?)
    }

    fn list_by_language(&self, language: &str) -> Result<Vec<Snippet>> {
        non_empty(self.load(Self::current_rows().filter(snippets::language.eq(language)))?)
    }

    fn list_by_tag(&self, fragment: &str) -> Result<Vec<Snippet>> {
        non_empty(self.load(Self::current_rows().filter(instr(snippets::tags, fragment).gt(0)))?)
    }

    fn list_by_language_and_tag(&self, language: &str, fragment: &str) -> Result<Vec<Snippet>> {
        let query = Self::current_rows()
            .filter(snippets::language.eq(language))
            .filter(instr(snippets::tags, fragment).gt(0));
        non_empty(self.load(query)?)
    }

    fn list_by_source(&self, fragment: &str) -> Result<Vec<Snippet>> {
        non_empty(self.load(Self::current_rows().filter(instr(snippets::source, fragment).gt(0)))?)
    }

    fn delete(&self, external_id: &Uuid) -> Result<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::other("snippet write lock poisoned"))?;
        let mut conn = self.pool.get()?;

        let removed = diesel::delete(snippets::table.filter(snippets::uuid.eq(external_id.to_string())))
            .execute(&mut *conn)?;
        log::debug!("Deleted {} versions of snippet {}", removed, external_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("Failed to create test store")
    }

    #[test]
    fn test_create_and_get() {
        let store = create_test_store();
        let created = store
            .create(
                SnippetDraft::new("fmt.Println(1)", "Go")
                    .with_name("print")
                    .with_tags("cli,demo"),
            )
            .unwrap();

        assert!(created.row_id > 0);
        assert_eq!(created.version, 1);
        assert!(created.is_current());

        let fetched = store.current(&created.external_id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_update_appends_version() {
        let store = create_test_store();
        let created = store
            .create(SnippetDraft::new("a", "Go").with_tags("a,b"))
            .unwrap();
        let updated = store
            .update(&created.external_id, SnippetDraft::new("b", ""))
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.tags.as_deref(), Some("a,b"));
        assert_eq!(updated.code, "b");

        let history = store.history(&created.external_id).unwrap();
        let versions: Vec<i64> = history.iter().map(|s| s.version).collect();
        assert_eq!(versions, vec![2, 1]);
        assert_eq!(history[1].superseded_by, Some(updated.row_id));
        assert_eq!(history[1].code, "a");
    }

    #[test]
    fn test_tag_fragment_is_not_a_pattern() {
        let store = create_test_store();
        store.create(SnippetDraft::new("a", "Go").with_tags("100%,x_y")).unwrap();
        store.create(SnippetDraft::new("b", "Go").with_tags("1000,xzy")).unwrap();

        let percent = store.list_by_tag("0%").unwrap();
        assert_eq!(percent.len(), 1);
        let underscore = store.list_by_tag("x_y").unwrap();
        assert_eq!(underscore.len(), 1);
        assert!(store.list_by_tag("X_Y").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let store = create_test_store();
        let created = store.create(SnippetDraft::new("x", "Go")).unwrap();
        store
            .update(&created.external_id, SnippetDraft::new("y", ""))
            .unwrap();

        assert_eq!(store.delete(&created.external_id).unwrap(), 2);
        assert_eq!(store.delete(&created.external_id).unwrap(), 0);
        assert!(store.current(&created.external_id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_pagination() {
        let store = create_test_store();
        for i in 0..5 {
            store.create(SnippetDraft::new(format!("code {i}"), "Go")).unwrap();
        }

        let first = store.list_current(1, 2).unwrap();
        let third = store.list_current(3, 2).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(third.len(), 1);
        assert_eq!(first[0].code, "code 4");
        assert_eq!(third[0].code, "code 0");
        assert!(store.list_current(4, 2).unwrap_err().is_not_found());
    }
}
