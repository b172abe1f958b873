//! Update snippet command

use super::{normalize_language, SnippetFields};
use crate::Context;
use anyhow::Result;
use clap::Args;
use csnip_core::Uuid;

#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Identity of the snippet to update
    #[arg(short, long)]
    pub id: Uuid,

    /// New language; omitted keeps the current one
    #[arg(short, long)]
    pub language: Option<String>,

    #[command(flatten)]
    pub fields: SnippetFields,
}

impl UpdateCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let language = self
            .language
            .as_deref()
            .map(|raw| normalize_language(ctx.languages.as_ref(), raw))
            .unwrap_or_default();
        let draft = self.fields.into_draft(language)?;

        if draft.is_empty() {
            anyhow::bail!(
                "Nothing to update. Supply at least one of --code, --language, --name, --tags, --description or --source."
            );
        }

        let snippet = ctx.store.update(&self.id, draft)?;
        println!(
            "✓ Updated snippet {} to version {}",
            snippet.external_id, snippet.version
        );
        Ok(())
    }
}
