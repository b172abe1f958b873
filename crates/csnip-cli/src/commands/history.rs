//! Version history command

use crate::utils::{format_snippet_list, print_snippet};
use crate::Context;
use anyhow::Result;
use clap::Args;
use csnip_core::Uuid;

#[derive(Args, Debug)]
pub struct HistoryCommand {
    /// Identity of the snippet
    #[arg(short, long)]
    pub id: Uuid,

    /// Show only this version in full
    #[arg(long)]
    pub version: Option<i64>,

    /// Output format: table, detailed, json, ids
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl HistoryCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let versions = ctx.store.history(&self.id)?;

        match self.version {
            Some(wanted) => {
                let snippet = versions
                    .iter()
                    .find(|s| s.version == wanted)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Snippet {} has no version {}", self.id, wanted)
                    })?;
                print_snippet(snippet, None)
            }
            None => format_snippet_list(&versions, &self.format),
        }
    }
}
