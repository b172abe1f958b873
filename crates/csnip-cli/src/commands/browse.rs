//! Interactive browse command

use crate::browser::{Browser, Effect, Event, Field, Mode};
use crate::utils::{print_snippet, truncate_text, try_copy};
use crate::Context;
use anyhow::Result;
use clap::Args;
use console::{style, Term};
use csnip_core::{Error, Snippet, SnippetDraft};
use dialoguer::{theme::ColorfulTheme, Confirm, Editor, Input, Select};

#[derive(Args, Debug, Default)]
pub struct BrowseCommand {}

impl BrowseCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut browser = Browser::new();
        browser.handle(Event::Loaded(load(ctx)?));

        loop {
            if let Some(status) = browser.take_status() {
                println!("{}", style(status).yellow());
            }

            let events = match browser.mode().clone() {
                Mode::Quit => return Ok(()),
                Mode::Viewing => prompt_viewing(&browser)?,
                Mode::Inspecting(snippet) => vec![prompt_inspecting(&snippet)?],
                Mode::EditingNew(draft) | Mode::EditingExisting(draft) => {
                    vec![prompt_editing(ctx, &browser, &draft)?]
                }
            };

            for event in events {
                let mut effect = browser.handle(event);
                // A save reports back with the stored snippet.
                while effect != Effect::None {
                    effect = match apply(ctx, effect)? {
                        Some(event) => browser.handle(event),
                        None => Effect::None,
                    };
                }
            }
        }
    }
}

fn load(ctx: &Context) -> Result<Vec<Snippet>> {
    match ctx.store.list_current(1, ctx.config.page_size) {
        Ok(snippets) => Ok(snippets),
        Err(Error::NoResults) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Carry out one effect against the store, returning any event it yields.
fn apply(ctx: &Context, effect: Effect) -> Result<Option<Event>> {
    let event = match effect {
        Effect::None | Effect::Exit => None,
        Effect::Reload => Some(Event::Loaded(load(ctx)?)),
        Effect::Create(draft) => Some(Event::Saved(ctx.store.create(draft)?)),
        Effect::Update(id, draft) => Some(Event::Saved(ctx.store.update(&id, draft)?)),
        Effect::Copy(code) => {
            if try_copy(&code) {
                println!("{}", style("✓ Copied to clipboard").green());
            }
            None
        }
        Effect::Delete(id) => {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Delete this snippet and its whole history?")
                .default(false)
                .interact()?;
            if confirmed {
                let removed = ctx.store.delete(&id)?;
                println!("✓ Deleted {} version(s)", removed);
            }
            Some(Event::Loaded(load(ctx)?))
        }
    };

    Ok(event)
}

fn prompt_viewing(browser: &Browser) -> Result<Vec<Event>> {
    let theme = ColorfulTheme::default();
    let width = usize::from(Term::stdout().size().1).saturating_sub(10).max(20);

    let mut items: Vec<String> = browser
        .snippets()
        .iter()
        .map(|s| {
            truncate_text(
                &format!("{} ({}) v{}", s.display_name(), s.language, s.version),
                width,
            )
        })
        .collect();
    let listed = items.len();
    items.push(style("[Add new snippet]").cyan().to_string());
    items.push(style("[Quit]").dim().to_string());

    let choice = Select::with_theme(&theme)
        .with_prompt(format!("{} snippet(s)", listed))
        .items(&items)
        .default(browser.cursor().min(items.len() - 1))
        .interact_opt()?;

    Ok(match choice {
        Some(index) if index < listed => vec![Event::Select(index), Event::Open],
        Some(index) if index == listed => vec![Event::Add],
        _ => vec![Event::Quit],
    })
}

fn prompt_inspecting(snippet: &Snippet) -> Result<Event> {
    println!();
    print_snippet(snippet, None)?;
    println!();

    let actions = [
        ("Copy code", Event::Copy),
        ("Edit", Event::Edit),
        ("Delete", Event::Delete),
        ("Back", Event::Cancel),
        ("Quit", Event::Quit),
    ];
    let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(choice.map_or(Event::Cancel, |i| actions[i].1.clone()))
}

fn prompt_editing(ctx: &Context, browser: &Browser, draft: &SnippetDraft) -> Result<Event> {
    let theme = ColorfulTheme::default();
    let heading = match browser.mode() {
        Mode::EditingNew(_) => "New snippet",
        _ => "Edit snippet",
    };

    let mut items: Vec<String> = Field::ALL
        .iter()
        .map(|field| {
            format!(
                "{:<12} {}",
                field.label(),
                truncate_text(field.get(draft).lines().next().unwrap_or_default(), 50)
            )
        })
        .collect();
    items.push(style("[Save]").green().to_string());
    items.push(style("[Cancel]").dim().to_string());

    let choice = Select::with_theme(&theme)
        .with_prompt(heading)
        .items(&items)
        .default(0)
        .interact_opt()?;

    let Some(index) = choice else {
        return Ok(Event::Cancel);
    };
    if index == Field::ALL.len() {
        return Ok(Event::Save);
    }
    let Some(&field) = Field::ALL.get(index) else {
        return Ok(Event::Cancel);
    };

    let current = field.get(draft).to_string();
    let value = match field {
        Field::Code => Editor::new()
            .extension(&extension_for(ctx, &draft.language))
            .edit(&current)?
            .unwrap_or(current),
        Field::Language => {
            let raw: String = Input::with_theme(&theme)
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            if raw.trim().is_empty() {
                raw
            } else {
                super::normalize_language(ctx.languages.as_ref(), &raw)
            }
        }
        Field::Tags => {
            let raw: String = Input::with_theme(&theme)
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            crate::utils::normalize_tags(&raw)
        }
        _ => Input::with_theme(&theme)
            .with_prompt(field.label())
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?,
    };

    Ok(Event::SetField(field, value))
}

fn extension_for(ctx: &Context, language: &str) -> String {
    format!(".{}", ctx.languages.normalize(language).extension())
}
