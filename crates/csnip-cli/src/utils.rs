//! Utility functions for CLI

use anyhow::Result;
use arboard::Clipboard;
use console::{style, Term};
use csnip_core::Snippet;
use std::io::Write;

/// Copy text to clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| anyhow::anyhow!("Failed to access clipboard: {}", e))?;

    clipboard
        .set_text(text)
        .map_err(|e| anyhow::anyhow!("Failed to copy to clipboard: {}", e))?;

    Ok(())
}

/// Copy, downgrading failure to a warning. Headless sessions have no clipboard.
pub fn try_copy(text: &str) -> bool {
    match copy_to_clipboard(text) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{e}");
            false
        }
    }
}

/// Format and display a list of snippets
pub fn format_snippet_list(snippets: &[Snippet], format: &str) -> Result<()> {
    match format {
        "table" => format_table(snippets),
        "detailed" => format_detailed(snippets),
        "json" => {
            println!("{}", serde_json::to_string_pretty(snippets)?);
            Ok(())
        }
        "ids" => {
            for snippet in snippets {
                println!("{}", snippet.external_id);
            }
            Ok(())
        }
        _ => anyhow::bail!("Unknown format '{}'. Use: table, detailed, json, ids", format),
    }
}

fn format_table(snippets: &[Snippet]) -> Result<()> {
    if snippets.is_empty() {
        return Ok(());
    }

    let mut term = Term::stdout();

    // Header
    writeln!(
        term,
        "{:<36} {:<30} {:<12} {:<20} {}",
        style("ID").bold().cyan(),
        style("Name").bold().cyan(),
        style("Language").bold().cyan(),
        style("Tags").bold().cyan(),
        style("Ver").bold().cyan()
    )?;

    writeln!(term, "{}", "─".repeat(104))?;

    for snippet in snippets {
        writeln!(
            term,
            "{:<36} {:<30} {:<12} {:<20} {}",
            style(snippet.external_id).green(),
            truncate_text(&snippet.display_name(), 30),
            snippet.language,
            style(truncate_text(snippet.tags.as_deref().unwrap_or(""), 20)).yellow(),
            style(snippet.version).dim()
        )?;
    }

    Ok(())
}

fn format_detailed(snippets: &[Snippet]) -> Result<()> {
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            println!("{}", "─".repeat(80));
        }
        print_snippet(snippet, Some(10))?;
    }
    Ok(())
}

/// Print one snippet with its metadata; `max_lines` limits the code preview.
pub fn print_snippet(snippet: &Snippet, max_lines: Option<usize>) -> Result<()> {
    let mut term = Term::stdout();

    writeln!(term, "{}: {}", style("ID").bold(), style(snippet.external_id).green())?;
    writeln!(term, "{}: {}", style("Name").bold(), snippet.display_name())?;
    writeln!(term, "{}: {}", style("Language").bold(), snippet.language)?;
    if !snippet.tag_list().is_empty() {
        writeln!(
            term,
            "{}: {}",
            style("Tags").bold(),
            style(snippet.tag_list().join(", ")).yellow()
        )?;
    }
    if let Some(description) = &snippet.description {
        writeln!(term, "{}: {}", style("Description").bold(), description)?;
    }
    if let Some(source) = &snippet.source {
        writeln!(term, "{}: {}", style("Source").bold(), source)?;
    }
    writeln!(
        term,
        "{}: {} ({})",
        style("Version").bold(),
        snippet.version,
        snippet.created_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(term, "{}:", style("Code").bold())?;

    let lines: Vec<&str> = snippet.code.lines().collect();
    let shown = max_lines.map_or(lines.len(), |max| max.min(lines.len()));
    for line in &lines[..shown] {
        writeln!(term, "  {}", line)?;
    }
    if shown < lines.len() {
        writeln!(term, "  {}", style("... (truncated)").dim())?;
    }

    Ok(())
}

/// Truncate text to fit within a given width, counting characters
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        text.to_string()
    } else if max_width <= 3 {
        "...".to_string()
    } else {
        let head: String = text.chars().take(max_width - 3).collect();
        format!("{}...", head)
    }
}

/// Split a comma list, trim entries, drop empty ones and re-join with `,`
pub fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
