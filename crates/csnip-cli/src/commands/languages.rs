//! List recognised languages

use anyhow::Result;
use clap::Args;
use csnip_core::LanguageNormalizer;

#[derive(Args, Debug, Default)]
pub struct LanguagesCommand {}

impl LanguagesCommand {
    pub fn execute(self, languages: &dyn LanguageNormalizer) -> Result<()> {
        for name in languages.supported() {
            println!("{name}");
        }
        Ok(())
    }
}
