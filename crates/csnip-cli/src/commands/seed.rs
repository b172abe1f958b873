//! Seed example snippets command

use crate::Context;
use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct SeedCommand {}

impl SeedCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message("Seeding example snippets...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let result = ctx.store.seed_examples();
        spinner.finish_and_clear();

        let created = result?;
        println!("✓ Seeded {} example snippets", created.len());
        Ok(())
    }
}
