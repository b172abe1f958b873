//! CLI commands module

use anyhow::{Context as _, Result};
use clap::Args;
use csnip_core::{Language, LanguageNormalizer, SnippetDraft};
use std::io::Read;
use std::path::Path;

// Command modules
pub mod add;
pub mod browse;
pub mod completions;
pub mod delete;
pub mod get;
pub mod history;
pub mod languages;
pub mod seed;
pub mod update;

/// Snippet fields shared by `add` and `update`
#[derive(Args, Debug, Default)]
pub struct SnippetFields {
    /// Code: literal text, `-` for stdin, or a path to an existing file
    #[arg(short, long)]
    pub code: Option<String>,

    /// Human-readable name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Free-text description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Where the snippet came from
    #[arg(short, long)]
    pub source: Option<String>,
}

impl SnippetFields {
    /// Build a draft, resolving the code argument and normalising tags.
    pub fn into_draft(self, language: String) -> Result<SnippetDraft> {
        let code = match self.code {
            Some(arg) => resolve_code(&arg)?,
            None => String::new(),
        };

        Ok(SnippetDraft {
            external_id: None,
            code,
            language,
            name: self.name,
            tags: self.tags.map(|t| crate::utils::normalize_tags(&t)),
            description: self.description,
            source: self.source,
        })
    }
}

/// Read code from stdin for `-`, from a file when the argument names one,
/// otherwise take it literally.
pub fn resolve_code(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read code from stdin")?;
        return Ok(buffer);
    }

    let path = Path::new(arg);
    if path.is_file() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read code from {}", path.display()));
    }

    Ok(arg.to_string())
}

/// Canonical language name for user input, warning on unrecognised input.
pub fn normalize_language(languages: &dyn LanguageNormalizer, raw: &str) -> String {
    let language = languages.normalize(raw);
    if language == Language::Other {
        log::warn!("Unrecognised language '{}', storing as {}", raw.trim(), language);
    }
    language.as_str().to_string()
}
