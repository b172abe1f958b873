//! Data models for csnip

use crate::error::Error;
use crate::schema::snippets;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One physical version of a snippet, as handed to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Store-assigned id of this physical row
    pub row_id: i64,
    /// Identity shared by every version of the logical snippet
    pub external_id: Uuid,
    pub name: Option<String>,
    pub code: String,
    pub language: String,
    /// Comma-joined tag list, matched by substring
    pub tags: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
    /// Position in the edit history, starting at 1
    pub version: i64,
    /// Row id of the next version, `None` while this row is current
    pub superseded_by: Option<i64>,
}

impl Snippet {
    /// Whether this row is the current version of its chain
    pub fn is_current(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// Split the stored tag string into trimmed, non-empty tags
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Name for display, falling back to a short form of the identity
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("untitled-{}", &self.external_id.simple().to_string()[..8]),
        }
    }
}

/// A snippet row as stored in the database
#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = snippets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbSnippet {
    pub id: i64,
    pub uuid: String,
    pub name: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
    pub version: i64,
    pub superseded_by: Option<i64>,
}

impl TryFrom<DbSnippet> for Snippet {
    type Error = Error;

    fn try_from(row: DbSnippet) -> Result<Self, Self::Error> {
        let external_id = Uuid::parse_str(&row.uuid).map_err(|e| Error::CorruptRow {
            row_id: row.id,
            reason: format!("invalid uuid '{}': {}", row.uuid, e),
        })?;

        Ok(Self {
            row_id: row.id,
            external_id,
            name: row.name,
            code: row.code,
            language: row.language,
            tags: row.tags,
            description: row.description,
            source: row.source,
            created_at: row.created_at,
            version: row.version,
            superseded_by: row.superseded_by,
        })
    }
}

/// A new physical row to be inserted into the database
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = snippets)]
pub struct NewDbSnippet {
    pub uuid: String,
    pub name: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
    pub version: i64,
}

impl NewDbSnippet {
    /// Build the row for `version` of the chain identified by `external_id`
    pub fn from_draft(
        draft: &SnippetDraft,
        external_id: Uuid,
        version: i64,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            uuid: external_id.to_string(),
            name: filled(draft.name.as_ref()),
            code: draft.code.clone(),
            language: draft.language.clone(),
            tags: filled(draft.tags.as_ref()),
            description: filled(draft.description.as_ref()),
            source: filled(draft.source.as_ref()),
            created_at,
            version,
        }
    }
}

/// Caller input for creating or updating a snippet.
///
/// Empty strings and `None` both mean "not supplied". On update, those
/// fields are inherited from the current version.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetDraft {
    /// Identity of an existing snippet; ignored by create, forced by update
    pub external_id: Option<Uuid>,
    pub code: String,
    pub language: String,
    pub name: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
}

impl SnippetDraft {
    /// Create a draft with the required fields
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            ..Self::default()
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the comma-joined tags
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach an identity
    pub fn with_external_id(mut self, external_id: Uuid) -> Self {
        self.external_id = Some(external_id);
        self
    }

    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
            && self.language.is_empty()
            && filled(self.name.as_ref()).is_none()
            && filled(self.tags.as_ref()).is_none()
            && filled(self.description.as_ref()).is_none()
            && filled(self.source.as_ref()).is_none()
    }

    /// Fill every unset field from `current`.
    ///
    /// Supplied fields win. The identity is always forced to the one of
    /// `current`, whatever the draft carried.
    pub fn merge_onto(self, current: &Snippet) -> Self {
        Self {
            external_id: Some(current.external_id),
            code: pick(self.code, &current.code),
            language: pick(self.language, &current.language),
            name: filled(self.name.as_ref()).or_else(|| current.name.clone()),
            tags: filled(self.tags.as_ref()).or_else(|| current.tags.clone()),
            description: filled(self.description.as_ref())
                .or_else(|| current.description.clone()),
            source: filled(self.source.as_ref()).or_else(|| current.source.clone()),
        }
    }
}

impl From<&Snippet> for SnippetDraft {
    fn from(snippet: &Snippet) -> Self {
        Self {
            external_id: Some(snippet.external_id),
            code: snippet.code.clone(),
            language: snippet.language.clone(),
            name: snippet.name.clone(),
            tags: snippet.tags.clone(),
            description: snippet.description.clone(),
            source: snippet.source.clone(),
        }
    }
}

fn filled(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn pick(supplied: String, current: &str) -> String {
    if supplied.is_empty() {
        current.to_string()
    } else {
        supplied
    }
}
