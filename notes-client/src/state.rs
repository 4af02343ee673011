//! Client-side note list and editor form.
//!
//! State only changes through [`update`], which consumes the old state and an
//! [`Event`] and returns the new state.

use crate::api::Note;

pub const LOAD_FAILED: &str = "Failed to fetch notes. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub loading: bool,
    pub error: Option<String>,
    pub notes: Vec<Note>,
    pub selected: Option<i64>,
    pub title: String,
    pub content: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            notes: Vec::new(),
            selected: None,
            title: String::new(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Loaded(Vec<Note>),
    LoadFailed,
    TitleChanged(String),
    ContentChanged(String),
    /// Loads the note into the form for editing.
    Selected(i64),
    Cancelled,
    /// The server assigned an id to a new note.
    Created(Note),
    /// Applied before the server confirms.
    Updated(Note),
    /// Applied before the server confirms.
    Deleted(i64),
}

impl AppState {
    /// Note built from the form for the selected id, if any is selected.
    pub fn edited_note(&self) -> Option<Note> {
        let id = self.selected?;
        let user_email = self
            .notes
            .iter()
            .find(|note| note.id == id)
            .map(|note| note.user_email.clone())
            .unwrap_or_default();

        Some(Note {
            id,
            title: self.title.clone(),
            content: self.content.clone(),
            user_email,
        })
    }

    fn clear_form(mut self) -> Self {
        self.selected = None;
        self.title.clear();
        self.content.clear();
        self
    }
}

pub fn update(mut state: AppState, event: Event) -> AppState {
    match event {
        Event::Loaded(notes) => {
            state.loading = false;
            state.error = None;
            state.notes = notes;
            state
        }
        Event::LoadFailed => {
            state.loading = false;
            state.error = Some(LOAD_FAILED.to_string());
            state
        }
        Event::TitleChanged(title) => {
            state.title = title;
            state
        }
        Event::ContentChanged(content) => {
            state.content = content;
            state
        }
        Event::Selected(id) => {
            let Some(note) = state.notes.iter().find(|note| note.id == id).cloned() else {
                return state;
            };
            state.selected = Some(note.id);
            state.title = note.title;
            state.content = note.content;
            state
        }
        Event::Cancelled => state.clear_form(),
        Event::Created(note) => {
            state.notes.push(note);
            state.clear_form()
        }
        Event::Updated(updated) => {
            if let Some(note) = state.notes.iter_mut().find(|note| note.id == updated.id) {
                *note = updated;
            }
            state.clear_form()
        }
        Event::Deleted(id) => {
            state.notes.retain(|note| note.id != id);
            if state.selected == Some(id) {
                state.clear_form()
            } else {
                state
            }
        }
    }
}
