//! In-memory storage backend for csnip.

use super::{non_empty, page_offset, SnippetStore};
use crate::error::{Error, Result};
use crate::models::{Snippet, SnippetDraft};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Arena of rows plus the per-identity chain indexes.
#[derive(Debug, Default)]
struct Arena {
    /// Every physical row, keyed by row id
    rows: BTreeMap<i64, Snippet>,
    /// Row ids of each chain in version order
    chains: HashMap<Uuid, Vec<i64>>,
    /// Row id of each chain's current version
    current: HashMap<Uuid, i64>,
    /// Last row id handed out; ids are never reused
    last_row_id: i64,
}

impl Arena {
    fn next_row_id(&mut self) -> i64 {
        self.last_row_id += 1;
        self.last_row_id
    }

    fn current_row(&self, external_id: &Uuid) -> Option<&Snippet> {
        self.current.get(external_id).and_then(|id| self.rows.get(id))
    }

    /// Current rows matching `keep`, newest row id first
    fn current_rows<F>(&self, keep: F) -> Vec<Snippet>
    where
        F: Fn(&Snippet) -> bool,
    {
        self.rows
            .values()
            .rev()
            .filter(|s| s.is_current() && keep(s))
            .cloned()
            .collect()
    }
}

/// A store that keeps all versions in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    arena: RwLock<Arena>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arena>> {
        self.arena
            .read()
            .map_err(|_| Error::other("snippet arena lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arena>> {
        self.arena
            .write()
            .map_err(|_| Error::other("snippet arena lock poisoned"))
    }

    fn insert_row(arena: &mut Arena, draft: &SnippetDraft, external_id: Uuid, version: i64) -> Snippet {
        let row = Snippet {
            row_id: arena.next_row_id(),
            external_id,
            name: filled(&draft.name),
            code: draft.code.clone(),
            language: draft.language.clone(),
            tags: filled(&draft.tags),
            description: filled(&draft.description),
            source: filled(&draft.source),
            created_at: Utc::now().naive_utc(),
            version,
            superseded_by: None,
        };
        arena.rows.insert(row.row_id, row.clone());
        arena.chains.entry(external_id).or_default().push(row.row_id);
        arena.current.insert(external_id, row.row_id);
        row
    }
}

impl SnippetStore for InMemoryStore {
    fn create(&self, draft: SnippetDraft) -> Result<Snippet> {
        let mut arena = self.write()?;
        let snippet = Self::insert_row(&mut arena, &draft, Uuid::new_v4(), 1);
        log::debug!("Created snippet {} (row {})", snippet.external_id, snippet.row_id);
        Ok(snippet)
    }

    fn update(&self, external_id: &Uuid, draft: SnippetDraft) -> Result<Snippet> {
        // Everything below runs under one write guard, so readers see either
        // the old chain or the finished one.
        let mut arena = self.write()?;
        let previous = arena
            .current_row(external_id)
            .cloned()
            .ok_or(Error::NotFound(*external_id))?;

        let merged = draft.merge_onto(&previous);
        let next = Self::insert_row(&mut arena, &merged, previous.external_id, previous.version + 1);
        if let Some(old) = arena.rows.get_mut(&previous.row_id) {
            old.superseded_by = Some(next.row_id);
        }

        log::debug!(
            "Updated snippet {} to version {} (row {} supersedes {})",
            external_id,
            next.version,
            next.row_id,
            previous.row_id
        );
        Ok(next)
    }

    fn current(&self, external_id: &Uuid) -> Result<Snippet> {
        self.read()?
            .current_row(external_id)
            .cloned()
            .ok_or(Error::NotFound(*external_id))
    }

    fn history(&self, external_id: &Uuid) -> Result<Vec<Snippet>> {
        let arena = self.read()?;
        let chain = arena
            .chains
            .get(external_id)
            .ok_or(Error::NotFound(*external_id))?;

        let mut versions: Vec<Snippet> = chain
            .iter()
            .filter_map(|id| arena.rows.get(id).cloned())
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    fn list_current(&self, page: i64, page_size: i64) -> Result<Vec<Snippet>> {
        let offset = usize::try_from(page_offset(page, page_size)?)
            .map_err(|_| Error::validation("page offset out of range"))?;
        let limit = usize::try_from(page_size).map_err(|_| Error::validation("page size out of range"))?;

        let rows = self.read()?.current_rows(|_| true);
        non_empty(rows.into_iter().skip(offset).take(limit).collect())
    }

    fn list_by_language(&self, language: &str) -> Result<Vec<Snippet>> {
        non_empty(self.read()?.current_rows(|s| s.language == language))
    }

    fn list_by_tag(&self, fragment: &str) -> Result<Vec<Snippet>> {
        non_empty(self.read()?.current_rows(|s| contains(&s.tags, fragment)))
    }

    fn list_by_language_and_tag(&self, language: &str, fragment: &str) -> Result<Vec<Snippet>> {
        non_empty(
            self.read()?
                .current_rows(|s| s.language == language && contains(&s.tags, fragment)),
        )
    }

    fn list_by_source(&self, fragment: &str) -> Result<Vec<Snippet>> {
        non_empty(self.read()?.current_rows(|s| contains(&s.source, fragment)))
    }

    fn delete(&self, external_id: &Uuid) -> Result<usize> {
        let mut arena = self.write()?;
        let Some(chain) = arena.chains.remove(external_id) else {
            return Ok(0);
        };
        arena.current.remove(external_id);
        for id in &chain {
            arena.rows.remove(id);
        }
        log::debug!("Deleted {} versions of snippet {}", chain.len(), external_id);
        Ok(chain.len())
    }
}

fn filled(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Plain substring containment; NULL-like fields never match.
fn contains(field: &Option<String>, fragment: &str) -> bool {
    field.as_deref().is_some_and(|f| f.contains(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_chain() {
        let store = InMemoryStore::new();
        let created = store
            .create(SnippetDraft::new("echo hi", "Bash").with_tags("shell"))
            .unwrap();
        assert_eq!(created.version, 1);
        assert_eq!(created.row_id, 1);

        let updated = store
            .update(&created.external_id, SnippetDraft::new("echo hello", ""))
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.tags.as_deref(), Some("shell"));
        assert_eq!(updated.language, "Bash");

        let history = store.history(&created.external_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].superseded_by, Some(updated.row_id));
        assert_eq!(store.current(&created.external_id).unwrap(), updated);
    }

    #[test]
    fn test_row_ids_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let first = store.create(SnippetDraft::new("a", "Go")).unwrap();
        assert_eq!(store.delete(&first.external_id).unwrap(), 1);
        let second = store.create(SnippetDraft::new("b", "Go")).unwrap();
        assert!(second.row_id > first.row_id);
    }

    #[test]
    fn test_delete_unknown_is_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.delete(&Uuid::new_v4()).unwrap(), 0);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        let err = store.update(&id, SnippetDraft::new("x", "Go")).unwrap_err();
        assert!(matches!(err, Error::NotFound(missing) if missing == id));
    }

    #[test]
    fn test_source_filter() {
        let store = InMemoryStore::new();
        store
            .create(SnippetDraft::new("a", "Go").with_source("https://gist.github.com/x"))
            .unwrap();
        store.create(SnippetDraft::new("b", "Go")).unwrap();
        let found = store.list_by_source("gist").unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.list_by_source("GIST").unwrap_err().is_not_found());
    }
}
