//! Fuzzy finder integration

use anyhow::Result;
use csnip_core::Snippet;
use skim::prelude::*;

// Simple wrapper for skim items
#[derive(Debug, Clone)]
struct SnippetItem {
    text: String,
    index: usize,
}

impl SkimItem for SnippetItem {
    fn text(&self) -> Cow<str> {
        Cow::Borrowed(&self.text)
    }

    fn output(&self) -> Cow<str> {
        Cow::Owned(self.index.to_string())
    }
}

/// One line per snippet, as shown in the finder
fn item_text(snippet: &Snippet) -> String {
    let tags = if snippet.tag_list().is_empty() {
        String::new()
    } else {
        format!(" [{}]", snippet.tag_list().join(", "))
    };
    format!("{} ({}){}", snippet.display_name(), snippet.language, tags)
}

pub fn fuzzy_select_snippet(snippets: &[Snippet]) -> Result<Option<Snippet>> {
    if snippets.is_empty() {
        return Ok(None);
    }

    let items: Vec<SnippetItem> = snippets
        .iter()
        .enumerate()
        .map(|(index, s)| SnippetItem {
            text: item_text(s),
            index,
        })
        .collect();

    // Create input channel for skim
    let (tx, rx): (SkimItemSender, SkimItemReceiver) = unbounded();
    std::thread::spawn(move || {
        for item in items {
            let _ = tx.send(Arc::new(item) as Arc<dyn SkimItem>);
        }
    });

    let options = SkimOptionsBuilder::default()
        .height(Some("40%"))
        .multi(false)
        .prompt(Some("Select snippet: "))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build skim options: {}", e))?;

    let selected_items = Skim::run_with(&options, Some(rx))
        .filter(|out| !out.is_abort)
        .map(|out| out.selected_items)
        .unwrap_or_default();

    Ok(selected_items
        .first()
        .and_then(|item| item.output().parse::<usize>().ok())
        .and_then(|index| snippets.get(index))
        .cloned())
}
