//! Delete snippet command

use crate::Context;
use anyhow::Result;
use clap::Args;
use csnip_core::Uuid;
use dialoguer::Confirm;

#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Identity of the snippet to delete
    #[arg(short, long)]
    pub id: Uuid,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl DeleteCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        if !self.yes {
            let snippet = ctx.store.current(&self.id)?;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete '{}' and all {} version(s)?",
                    snippet.display_name(),
                    snippet.version
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Operation cancelled.");
                return Ok(());
            }
        }

        match ctx.store.delete(&self.id)? {
            0 => println!("No snippet found with id {}", self.id),
            removed => println!("✓ Deleted snippet {} ({} version(s))", self.id, removed),
        }
        Ok(())
    }
}
