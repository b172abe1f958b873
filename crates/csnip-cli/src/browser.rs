//! Interactive browsing as a plain state machine.
//!
//! The [`Browser`] never touches the store or the terminal. A driver feeds
//! it [`Event`]s and carries out the [`Effect`] each transition returns.

use csnip_core::{Snippet, SnippetDraft, Uuid};

/// What the browser is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// The list of current snippets
    Viewing,
    /// One snippet in full
    Inspecting(Snippet),
    /// A draft for a brand-new snippet
    EditingNew(SnippetDraft),
    /// A draft for the next version of an existing snippet
    EditingExisting(SnippetDraft),
    Quit,
}

/// Editable draft fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Code,
    Language,
    Tags,
    Description,
    Source,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Code,
        Self::Language,
        Self::Tags,
        Self::Description,
        Self::Source,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Code => "Code",
            Self::Language => "Language",
            Self::Tags => "Tags",
            Self::Description => "Description",
            Self::Source => "Source",
        }
    }

    /// The field's value in `draft`, empty when unset
    pub fn get(self, draft: &SnippetDraft) -> &str {
        match self {
            Self::Code => &draft.code,
            Self::Language => &draft.language,
            Self::Name => draft.name.as_deref().unwrap_or_default(),
            Self::Tags => draft.tags.as_deref().unwrap_or_default(),
            Self::Description => draft.description.as_deref().unwrap_or_default(),
            Self::Source => draft.source.as_deref().unwrap_or_default(),
        }
    }

    fn set(self, draft: &mut SnippetDraft, value: String) {
        match self {
            Self::Code => draft.code = value,
            Self::Language => draft.language = value,
            Self::Name => draft.name = Some(value),
            Self::Tags => draft.tags = Some(value),
            Self::Description => draft.description = Some(value),
            Self::Source => draft.source = Some(value),
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A fresh listing of current snippets
    Loaded(Vec<Snippet>),
    MoveUp,
    MoveDown,
    /// Jump the cursor to an index
    Select(usize),
    Open,
    Edit,
    Add,
    SetField(Field, String),
    Save,
    Cancel,
    Delete,
    Copy,
    /// The store accepted a create or update
    Saved(Snippet),
    Quit,
}

/// Work the driver must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Reload,
    Create(SnippetDraft),
    Update(Uuid, SnippetDraft),
    Delete(Uuid),
    Copy(String),
    Exit,
}

#[derive(Debug)]
pub struct Browser {
    snippets: Vec<Snippet>,
    cursor: usize,
    mode: Mode,
    status: Option<String>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    pub fn new() -> Self {
        Self {
            snippets: Vec::new(),
            cursor: 0,
            mode: Mode::Viewing,
            status: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&Snippet> {
        self.snippets.get(self.cursor)
    }

    /// Take the pending status message, if any
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Apply one event and report what the driver should do next.
    pub fn handle(&mut self, event: Event) -> Effect {
        if self.mode == Mode::Quit {
            return Effect::Exit;
        }

        match event {
            Event::Quit => {
                self.mode = Mode::Quit;
                Effect::Exit
            }
            Event::Loaded(snippets) => {
                self.snippets = snippets;
                self.cursor = self.cursor.min(self.snippets.len().saturating_sub(1));
                Effect::None
            }
            Event::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                Effect::None
            }
            Event::MoveDown => {
                if self.cursor + 1 < self.snippets.len() {
                    self.cursor += 1;
                }
                Effect::None
            }
            Event::Select(index) => {
                if index < self.snippets.len() {
                    self.cursor = index;
                }
                Effect::None
            }
            Event::Saved(snippet) => {
                if let Some(pos) = self
                    .snippets
                    .iter()
                    .position(|s| s.external_id == snippet.external_id)
                {
                    self.cursor = pos;
                }
                self.status = Some(format!(
                    "Saved {} (version {})",
                    snippet.display_name(),
                    snippet.version
                ));
                self.mode = Mode::Inspecting(snippet);
                Effect::Reload
            }
            event => self.handle_in_mode(event),
        }
    }

    fn handle_in_mode(&mut self, event: Event) -> Effect {
        let mode = std::mem::replace(&mut self.mode, Mode::Viewing);
        let (mode, effect) = match (mode, event) {
            (Mode::Viewing, Event::Open) => match self.selected() {
                Some(snippet) => (Mode::Inspecting(snippet.clone()), Effect::None),
                None => (Mode::Viewing, Effect::None),
            },
            (Mode::Viewing, Event::Add) => (Mode::EditingNew(SnippetDraft::default()), Effect::None),
            (Mode::Viewing, Event::Edit) => match self.selected() {
                Some(snippet) => (Mode::EditingExisting(SnippetDraft::from(snippet)), Effect::None),
                None => (Mode::Viewing, Effect::None),
            },
            (Mode::Viewing, Event::Delete) => match self.selected() {
                Some(snippet) => (Mode::Viewing, Effect::Delete(snippet.external_id)),
                None => (Mode::Viewing, Effect::None),
            },
            (Mode::Inspecting(snippet), Event::Edit) => {
                (Mode::EditingExisting(SnippetDraft::from(&snippet)), Effect::None)
            }
            (Mode::Inspecting(snippet), Event::Copy) => {
                let code = snippet.code.clone();
                (Mode::Inspecting(snippet), Effect::Copy(code))
            }
            (Mode::Inspecting(snippet), Event::Delete) => {
                (Mode::Viewing, Effect::Delete(snippet.external_id))
            }
            (Mode::Inspecting(_), Event::Cancel) | (Mode::EditingNew(_), Event::Cancel) => {
                (Mode::Viewing, Effect::None)
            }
            (Mode::EditingNew(mut draft), Event::SetField(field, value)) => {
                field.set(&mut draft, value);
                (Mode::EditingNew(draft), Effect::None)
            }
            (Mode::EditingExisting(mut draft), Event::SetField(field, value)) => {
                field.set(&mut draft, value);
                (Mode::EditingExisting(draft), Effect::None)
            }
            (Mode::EditingNew(draft), Event::Save) => {
                let effect = self.save_effect(&draft);
                (Mode::EditingNew(draft), effect)
            }
            (Mode::EditingExisting(draft), Event::Save) => {
                let effect = self.save_effect(&draft);
                (Mode::EditingExisting(draft), effect)
            }
            (Mode::EditingExisting(draft), Event::Cancel) => {
                let back = self
                    .snippets
                    .iter()
                    .find(|s| Some(s.external_id) == draft.external_id)
                    .cloned()
                    .map_or(Mode::Viewing, Mode::Inspecting);
                (back, Effect::None)
            }
            (mode, _) => (mode, Effect::None),
        };
        self.mode = mode;
        effect
    }

    /// `Create` for drafts without an identity, `Update` for the rest.
    fn save_effect(&mut self, draft: &SnippetDraft) -> Effect {
        match draft.external_id {
            Some(_) if draft.is_empty() => {
                self.status = Some("Nothing to save".to_string());
                Effect::None
            }
            Some(id) => Effect::Update(id, draft.clone()),
            None if draft.code.trim().is_empty() || draft.language.trim().is_empty() => {
                self.status = Some("Code and language are required".to_string());
                Effect::None
            }
            None => Effect::Create(draft.clone()),
        }
    }
}
