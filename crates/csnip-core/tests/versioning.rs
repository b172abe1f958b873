//! Behaviour every store backend must share.

use csnip_core::{Error, InMemoryStore, SnippetDraft, SnippetStore, SqliteStore, Uuid};
use diesel::connection::SimpleConnection;
use proptest::prelude::*;

fn backends() -> Vec<Box<dyn SnippetStore>> {
    vec![
        Box::new(SqliteStore::open_in_memory().expect("in-memory sqlite")),
        Box::new(InMemoryStore::new()),
    ]
}

#[test]
fn round_trip_preserves_fields() {
    for store in backends() {
        let created = store
            .create(
                SnippetDraft::new("SELECT 1;", "SQL")
                    .with_name("one")
                    .with_tags("db,trivial")
                    .with_description("selects one")
                    .with_source("psql"),
            )
            .unwrap();

        let fetched = store.current(&created.external_id).unwrap();
        assert_eq!(fetched.code, "SELECT 1;");
        assert_eq!(fetched.language, "SQL");
        assert_eq!(fetched.name.as_deref(), Some("one"));
        assert_eq!(fetched.tags.as_deref(), Some("db,trivial"));
        assert_eq!(fetched.description.as_deref(), Some("selects one"));
        assert_eq!(fetched.source.as_deref(), Some("psql"));
        assert_eq!(fetched.version, 1);
        assert_eq!(fetched.superseded_by, None);
        assert!(fetched.row_id > 0);
        assert!(!fetched.external_id.is_nil());
        assert_eq!(fetched, created);
    }
}

#[test]
fn create_ignores_supplied_identity() {
    for store in backends() {
        let wanted = Uuid::new_v4();
        let created = store
            .create(SnippetDraft::new("x", "Go").with_external_id(wanted))
            .unwrap();
        assert_ne!(created.external_id, wanted);
    }
}

#[test]
fn update_merges_and_keeps_identity() {
    for store in backends() {
        let created = store
            .create(SnippetDraft::new("print(1)", "Python").with_tags("a,b").with_name("n"))
            .unwrap();

        let updated = store
            .update(
                &created.external_id,
                SnippetDraft::new("print(2)", "").with_external_id(Uuid::new_v4()),
            )
            .unwrap();

        assert_eq!(updated.external_id, created.external_id);
        assert_eq!(updated.code, "print(2)");
        assert_eq!(updated.language, "Python");
        assert_eq!(updated.tags.as_deref(), Some("a,b"));
        assert_eq!(updated.name.as_deref(), Some("n"));
        assert_ne!(updated.row_id, created.row_id);
    }
}

#[test]
fn update_of_unknown_identity_is_not_found() {
    for store in backends() {
        let missing = Uuid::new_v4();
        let err = store.update(&missing, SnippetDraft::new("x", "Go")).unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == missing));
        assert!(store.history(&missing).unwrap_err().is_not_found());
    }
}

#[test]
fn exactly_one_current_row_per_chain() {
    for store in backends() {
        let created = store.create(SnippetDraft::new("v1", "Go")).unwrap();
        for i in 2..=4 {
            store
                .update(&created.external_id, SnippetDraft::new(format!("v{i}"), ""))
                .unwrap();
        }

        let history = store.history(&created.external_id).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history.iter().filter(|s| s.is_current()).count(), 1);
        assert_eq!(history[0].code, "v4");
        // Each superseded row points at its successor.
        for pair in history.windows(2) {
            assert_eq!(pair[1].superseded_by, Some(pair[0].row_id));
        }

        let listed = store.list_current(1, 100).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].version, 4);
    }
}

#[test]
fn updated_snippet_moves_to_front_of_listing() {
    for store in backends() {
        let a = store.create(SnippetDraft::new("a1", "Go")).unwrap();
        let b = store.create(SnippetDraft::new("b", "Go")).unwrap();
        store
            .update(&a.external_id, SnippetDraft::new("a2", ""))
            .unwrap();

        let listed = store.list_current(1, 10).unwrap();
        let codes: Vec<&str> = listed.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["a2", "b"]);
        assert_eq!(listed[0].external_id, a.external_id);
        assert_eq!(listed[0].version, 2);

        let second = store.list_current(2, 1).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].external_id, b.external_id);
        assert!(matches!(store.list_current(3, 1), Err(Error::NoResults)));
    }
}

#[test]
fn oversized_page_is_rejected() {
    for store in backends() {
        store.create(SnippetDraft::new("x", "Go")).unwrap();
        assert!(matches!(
            store.list_current(i64::MAX, 2),
            Err(Error::Validation(_))
        ));
        assert!(matches!(store.list_current(0, 2), Err(Error::Validation(_))));
    }
}

#[test]
fn delete_removes_whole_chain() {
    for store in backends() {
        let kept = store.create(SnippetDraft::new("keep", "Go")).unwrap();
        let doomed = store.create(SnippetDraft::new("d1", "Go")).unwrap();
        store
            .update(&doomed.external_id, SnippetDraft::new("d2", ""))
            .unwrap();

        assert_eq!(store.delete(&doomed.external_id).unwrap(), 2);
        assert!(store.current(&doomed.external_id).unwrap_err().is_not_found());
        assert!(store.history(&doomed.external_id).unwrap_err().is_not_found());
        assert_eq!(store.current(&kept.external_id).unwrap().code, "keep");
    }
}

#[test]
fn filters_by_language_and_tag() {
    for store in backends() {
        store
            .create(SnippetDraft::new("package main", "Go").with_tags("cli,web"))
            .unwrap();
        store
            .create(SnippetDraft::new("import os", "Python").with_tags("cli"))
            .unwrap();
        store
            .create(SnippetDraft::new("func f() {}", "Go").with_tags("util"))
            .unwrap();

        assert_eq!(store.list_by_language("Go").unwrap().len(), 2);
        assert_eq!(store.list_by_tag("cli").unwrap().len(), 2);

        let both = store.list_by_language_and_tag("Go", "cli").unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].code, "package main");

        // Exact match on language, no case folding.
        assert!(matches!(store.list_by_language("go"), Err(Error::NoResults)));
        assert!(matches!(
            store.list_by_language_and_tag("Python", "web"),
            Err(Error::NoResults)
        ));
    }
}

#[test]
fn filters_only_see_current_versions() {
    for store in backends() {
        let created = store
            .create(SnippetDraft::new("a", "Go").with_tags("old"))
            .unwrap();
        store
            .update(&created.external_id, SnippetDraft::new("", "").with_tags("new"))
            .unwrap();

        assert!(store.list_by_tag("old").unwrap_err().is_not_found());
        let found = store.list_by_tag("new").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version, 2);
        assert_eq!(found[0].code, "a");
    }
}

#[test]
fn seed_creates_independent_examples() {
    for store in backends() {
        let seeded = store.seed_examples().unwrap();
        assert_eq!(seeded.len(), 9);
        assert!(seeded.iter().all(|s| s.version == 1));

        let go = store.list_by_language("Go").unwrap();
        assert_eq!(go.len(), 1);
        assert_eq!(go[0].name.as_deref(), Some("Hello World Example in Go"));

        // Seeding twice yields new identities, not versions.
        store.seed_examples().unwrap();
        assert_eq!(store.list_by_language("Go").unwrap().len(), 2);
        assert_eq!(store.list_by_source("generated").unwrap().len(), 18);
    }
}

#[test]
fn failed_update_leaves_chain_untouched() {
    let store = SqliteStore::open_in_memory().unwrap();
    let created = store.create(SnippetDraft::new("original", "Go")).unwrap();

    store
        .pool()
        .get()
        .unwrap()
        .batch_execute(
            "CREATE TRIGGER fail_supersede BEFORE UPDATE OF superseded_by ON snippets \
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
        )
        .unwrap();

    let err = store
        .update(&created.external_id, SnippetDraft::new("changed", ""))
        .unwrap_err();
    assert!(matches!(err, Error::Transaction { stage: "supersede", .. }));

    let history = store.history(&created.external_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(store.current(&created.external_id).unwrap(), created);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snippets.db");

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        let created = store.create(SnippetDraft::new("v1", "Rust")).unwrap();
        store
            .update(&created.external_id, SnippetDraft::new("v2", ""))
            .unwrap();
        created.external_id
    };

    let store = SqliteStore::open(&path).unwrap();
    let current = store.current(&id).unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.code, "v2");
}

#[test]
fn concurrent_updates_serialise() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("race.db")).unwrap();
    let created = store.create(SnippetDraft::new("0", "Go")).unwrap();
    let id = created.external_id;

    std::thread::scope(|scope| {
        for i in 0..4 {
            let store = store.clone();
            scope.spawn(move || {
                for j in 0..5 {
                    store
                        .update(&id, SnippetDraft::new(format!("{i}-{j}"), ""))
                        .unwrap();
                }
            });
        }
    });

    let history = store.history(&id).unwrap();
    assert_eq!(history.len(), 21);
    let mut versions: Vec<i64> = history.iter().map(|s| s.version).collect();
    versions.sort_unstable();
    assert_eq!(versions, (1..=21).collect::<Vec<_>>());
    assert_eq!(history.iter().filter(|s| s.is_current()).count(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn versions_are_contiguous(codes in prop::collection::vec("[a-z]{0,6}", 1..8)) {
        for store in backends() {
            let created = store.create(SnippetDraft::new("start", "Go")).unwrap();
            for code in &codes {
                store.update(&created.external_id, SnippetDraft::new(code.clone(), "")).unwrap();
            }

            let history = store.history(&created.external_id).unwrap();
            let versions: Vec<i64> = history.iter().map(|s| s.version).collect();
            let expected: Vec<i64> = (1..=codes.len() as i64 + 1).rev().collect();
            prop_assert_eq!(versions, expected);

            // An empty code inherits the previous one.
            let last_code = codes
                .iter()
                .rev()
                .find(|c| !c.is_empty())
                .map_or("start", String::as_str);
            prop_assert_eq!(store.current(&created.external_id).unwrap().code, last_code);
        }
    }
}
