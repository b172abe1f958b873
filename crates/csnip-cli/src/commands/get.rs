//! Get snippets command

use super::normalize_language;
use crate::fuzzy::fuzzy_select_snippet;
use crate::utils::{format_snippet_list, print_snippet, try_copy};
use crate::Context;
use anyhow::Result;
use clap::Args;
use csnip_core::{Error, Snippet, Uuid};

#[derive(Args, Debug, Default)]
pub struct GetCommand {
    /// Fetch one snippet by identity
    #[arg(short, long)]
    pub id: Option<Uuid>,

    /// Filter by language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Filter by tag substring (case-sensitive)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Filter by source substring (case-sensitive)
    #[arg(short, long)]
    pub source: Option<String>,

    /// List every current snippet
    #[arg(short, long)]
    pub all: bool,

    /// Page to show with --all, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Page size with --all (defaults to the configured page_size)
    #[arg(long)]
    pub limit: Option<i64>,

    /// Pick one result with the fuzzy finder
    #[arg(long)]
    pub interactive: bool,

    /// Output format: table, detailed, json, ids
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Do not copy a single snippet to the clipboard
    #[arg(long)]
    pub no_copy: bool,
}

/// Which store query a `get` invocation maps to
#[derive(Debug, PartialEq, Eq)]
enum Query<'a> {
    Id(Uuid),
    LanguageAndTag(String, &'a str),
    Language(String),
    Tag(&'a str),
    Source(&'a str),
    All { page: i64, limit: i64 },
}

impl GetCommand {
    fn query(&self, ctx: &Context) -> Query<'_> {
        let language = self
            .language
            .as_deref()
            .map(|raw| normalize_language(ctx.languages.as_ref(), raw));

        match (self.id, language, self.tag.as_deref(), self.source.as_deref()) {
            (Some(id), ..) => Query::Id(id),
            (None, Some(lang), Some(tag), _) => Query::LanguageAndTag(lang, tag),
            (None, Some(lang), None, _) => Query::Language(lang),
            (None, None, Some(tag), _) => Query::Tag(tag),
            (None, None, None, Some(source)) => Query::Source(source),
            (None, None, None, None) => Query::All {
                page: self.page,
                limit: self.limit.unwrap_or(ctx.config.page_size),
            },
        }
    }

    pub fn execute(self, ctx: &Context) -> Result<()> {
        let query = self.query(ctx);
        if matches!(query, Query::All { .. }) && !self.all {
            log::debug!("No filter given, listing all current snippets");
        }

        let found = match query {
            Query::Id(id) => ctx.store.current(&id).map(|s| vec![s]),
            Query::LanguageAndTag(lang, tag) => ctx.store.list_by_language_and_tag(&lang, tag),
            Query::Language(lang) => ctx.store.list_by_language(&lang),
            Query::Tag(tag) => ctx.store.list_by_tag(tag),
            Query::Source(source) => ctx.store.list_by_source(source),
            Query::All { page, limit } => ctx.store.list_current(page, limit),
        };

        let snippets = match found {
            Ok(snippets) => snippets,
            Err(Error::NoResults) => {
                println!("No snippets found.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if self.interactive {
            return match fuzzy_select_snippet(&snippets)? {
                Some(selected) => self.show_one(ctx, &selected),
                None => {
                    println!("No snippet selected.");
                    Ok(())
                }
            };
        }

        match snippets.as_slice() {
            [single] if self.id.is_some() => self.show_one(ctx, single),
            _ => format_snippet_list(&snippets, &self.format),
        }
    }

    fn show_one(&self, ctx: &Context, snippet: &Snippet) -> Result<()> {
        match self.format.as_str() {
            "table" | "detailed" => print_snippet(snippet, None)?,
            other => format_snippet_list(std::slice::from_ref(snippet), other)?,
        }

        if ctx.config.copy_on_get && !self.no_copy && try_copy(&snippet.code) {
            eprintln!("✓ Copied to clipboard");
        }
        Ok(())
    }
}
