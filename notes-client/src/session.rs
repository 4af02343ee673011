use crate::{
    api::NotesApi,
    state::{AppState, Event, update},
};

/// A signed-in user's view of their notes.
///
/// Edits and deletes are applied to local state first and then sent to the
/// server. A failed call is logged and the local change is kept, so the list
/// may disagree with the server until the next [`Session::refresh`].
pub struct Session {
    api: NotesApi,
    state: AppState,
}

impl Session {
    pub fn new(api: NotesApi) -> Self {
        Self {
            api,
            state: AppState::default(),
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = update(state, event);
    }

    pub async fn refresh(&mut self) {
        match self.api.list().await {
            Ok(notes) => self.dispatch(Event::Loaded(notes)),
            Err(e) => {
                tracing::error!("Failed to fetch notes: {e}");
                self.dispatch(Event::LoadFailed);
            }
        }
    }

    /// Creates a note from the form. The id comes from the server, so this
    /// one waits for the response before touching the list.
    pub async fn add_note(&mut self) {
        if self.state.title.is_empty() || self.state.content.is_empty() {
            tracing::warn!("Title and content are required");
            return;
        }

        match self.api.create(&self.state.title, &self.state.content).await {
            Ok(note) => self.dispatch(Event::Created(note)),
            Err(e) => tracing::error!("Failed to create note: {e}"),
        }
    }

    pub async fn save_selected(&mut self) {
        let Some(note) = self.state.edited_note() else {
            return;
        };
        self.dispatch(Event::Updated(note.clone()));

        if let Err(e) = self.api.update(note.id, &note.title, &note.content).await {
            tracing::error!("Failed to update note {}: {e}", note.id);
        }
    }

    pub async fn delete(&mut self, id: i64) {
        self.dispatch(Event::Deleted(id));

        if let Err(e) = self.api.delete(id).await {
            tracing::error!("Failed to delete note {id}: {e}");
        }
    }
}
