//! Add snippet command

use super::{normalize_language, SnippetFields};
use crate::Context;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct AddCommand {
    /// Programming language (aliases such as `golang` or `py` are accepted)
    #[arg(short, long)]
    pub language: String,

    #[command(flatten)]
    pub fields: SnippetFields,
}

impl AddCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let language = normalize_language(ctx.languages.as_ref(), &self.language);
        let draft = self.fields.into_draft(language)?;

        if draft.code.trim().is_empty() {
            anyhow::bail!("Code cannot be empty. Pass it with --code, or `--code -` to read stdin.");
        }

        let snippet = ctx.store.create(draft)?;
        println!("✓ Added snippet {}", snippet.external_id);
        println!("  {} ({})", snippet.display_name(), snippet.language);
        if !snippet.tag_list().is_empty() {
            println!("  Tags: {}", snippet.tag_list().join(", "));
        }

        Ok(())
    }
}
