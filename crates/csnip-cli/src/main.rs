//! csnip CLI Application

mod browser;
mod commands;
mod db;
mod fuzzy;
mod utils;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{
    add::AddCommand, browse::BrowseCommand, completions::CompletionsCommand,
    delete::DeleteCommand, get::GetCommand, history::HistoryCommand,
    languages::LanguagesCommand, seed::SeedCommand, update::UpdateCommand,
};
use csnip_core::{Config, LanguageNormalizer, SnippetStore};
use std::path::PathBuf;

/// Everything a command needs: the store, the language table and settings
pub struct Context {
    pub store: Box<dyn SnippetStore>,
    pub languages: Box<dyn LanguageNormalizer>,
    pub config: Config,
}

#[derive(Parser)]
#[command(name = "csnip")]
#[command(about = "A personal code snippet manager with version history")]
#[command(version)]
pub struct Cli {
    /// Path to the snippet database (overrides config and CSNIP_DATABASE)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch snippets by id, language, tag or source
    Get(GetCommand),
    /// Add a new snippet
    Add(AddCommand),
    /// Record a new version of a snippet
    Update(UpdateCommand),
    /// Delete a snippet and its whole history
    Delete(DeleteCommand),
    /// Show every version of a snippet
    History(HistoryCommand),
    /// Insert the built-in example snippets
    Seed(SeedCommand),
    /// List the recognised languages
    Languages(LanguagesCommand),
    /// Generate shell completion scripts
    Completions(CompletionsCommand),
    /// Browse and edit snippets interactively
    Browse(BrowseCommand),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("CSNIP_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Browse(BrowseCommand::default()));

    match command {
        // These two need no database.
        Commands::Completions(cmd) => cmd.execute(),
        Commands::Languages(cmd) => cmd.execute(&csnip_core::BuiltinLanguages),
        other => {
            let ctx = db::open_context(cli.database)?;
            run(other, &ctx)
        }
    }
}

fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Get(cmd) => cmd.execute(ctx),
        Commands::Add(cmd) => cmd.execute(ctx),
        Commands::Update(cmd) => cmd.execute(ctx),
        Commands::Delete(cmd) => cmd.execute(ctx),
        Commands::History(cmd) => cmd.execute(ctx),
        Commands::Seed(cmd) => cmd.execute(ctx),
        Commands::Browse(cmd) => cmd.execute(ctx),
        Commands::Completions(cmd) => cmd.execute(),
        Commands::Languages(cmd) => cmd.execute(ctx.languages.as_ref()),
    }
}
