//! Storage backends for csnip.
//!
//! Every backend keeps an append-only version chain per logical snippet:
//! an update inserts a new row and points the previous current row at it
//! through `superseded_by`. Rows are never edited otherwise.

mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::{Snippet, SnippetDraft};
use crate::seed;
use uuid::Uuid;

/// The contract the command and interactive layers program against.
pub trait SnippetStore: Send + Sync + std::fmt::Debug {
    /// Insert version 1 of a new logical snippet under a fresh identity.
    fn create(&self, draft: SnippetDraft) -> Result<Snippet>;

    /// Append the next version of `external_id`, merging unset fields from
    /// the current version. Atomic: on failure the chain is untouched.
    fn update(&self, external_id: &Uuid, draft: SnippetDraft) -> Result<Snippet>;

    /// The current version of a snippet.
    fn current(&self, external_id: &Uuid) -> Result<Snippet>;

    /// Every version of a snippet, newest first.
    fn history(&self, external_id: &Uuid) -> Result<Vec<Snippet>>;

    /// Current snippets, most recently inserted row first. `page` is 1-based.
    fn list_current(&self, page: i64, page_size: i64) -> Result<Vec<Snippet>>;

    /// Current snippets with exactly this language.
    fn list_by_language(&self, language: &str) -> Result<Vec<Snippet>>;

    /// Current snippets whose tags contain `fragment` (case-sensitive).
    fn list_by_tag(&self, fragment: &str) -> Result<Vec<Snippet>>;

    /// Both of the above at once.
    fn list_by_language_and_tag(&self, language: &str, fragment: &str) -> Result<Vec<Snippet>>;

    /// Current snippets whose source contains `fragment` (case-sensitive).
    fn list_by_source(&self, fragment: &str) -> Result<Vec<Snippet>>;

    /// Remove every version of a snippet. Returns the number of rows removed.
    fn delete(&self, external_id: &Uuid) -> Result<usize>;

    /// Create one independent example snippet per catalogue language.
    fn seed_examples(&self) -> Result<Vec<Snippet>> {
        let created = seed::example_drafts()
            .into_iter()
            .map(|draft| self.create(draft))
            .collect::<Result<Vec<_>>>()?;
        log::info!("Seeded {} example snippets", created.len());
        Ok(created)
    }
}

/// Turn an empty listing into the not-found-class signal.
pub(crate) fn non_empty(rows: Vec<Snippet>) -> Result<Vec<Snippet>> {
    if rows.is_empty() {
        Err(crate::error::Error::NoResults)
    } else {
        Ok(rows)
    }
}

/// Reject pages below 1 before they turn into negative offsets.
pub(crate) fn page_offset(page: i64, page_size: i64) -> Result<i64> {
    if page < 1 || page_size < 1 {
        return Err(crate::error::Error::validation(format!(
            "page and page size must be at least 1 (got page {page}, size {page_size})"
        )));
    }
    (page - 1).checked_mul(page_size).ok_or_else(|| {
        crate::error::Error::validation(format!(
            "page {page} with page size {page_size} is out of range"
        ))
    })
}
