use super::{strip_empty_paragraphs, NoteStore};
use crate::models::Note;

/// Which note is open, and whether it is open for editing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    pub current: Option<String>,
    pub edit_mode: bool,
}

impl Selection {
    pub fn read(id: impl Into<String>) -> Self {
        Self {
            current: Some(id.into()),
            edit_mode: false,
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            current: Some(id.into()),
            edit_mode: true,
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }
}

/// Notes plus the current selection: everything the router projects onto
/// the URL. Every note operation goes through here so the two never drift.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Notebook {
    pub notes: NoteStore,
    pub selection: Selection,
}

impl Notebook {
    /// Prepend `note` and open it in edit mode.
    pub fn add(&mut self, note: Note) -> bool {
        let id = note.id.clone();
        if !self.notes.prepend(note) {
            return false;
        }
        self.selection = Selection::edit(id);
        true
    }

    /// Store an edited note in place and leave edit mode.
    ///
    /// Returns the note as stored (empty paragraphs stripped), or `None` when
    /// the id is no longer present (e.g. deleted while the editor was open).
    pub fn save(&mut self, mut note: Note) -> Option<Note> {
        note.body = strip_empty_paragraphs(&note.body);
        if !self.notes.replace(note.clone()) {
            return None;
        }
        self.selection = Selection::read(note.id.clone());
        Some(note)
    }

    /// Remove a note and fall back to the first remaining one in read mode.
    pub fn delete(&mut self, id: &str) -> Option<Note> {
        let removed = self.notes.remove(id)?;
        self.selection = match self.notes.first_id() {
            Some(first) => Selection::read(first),
            None => Selection::default(),
        };
        Some(removed)
    }

    /// Overwrite the whole collection with the server's copy. A selection
    /// pointing at a note that no longer exists is dropped.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = NoteStore::from_notes(notes);
        let stale = self
            .selection
            .current
            .as_deref()
            .is_some_and(|id| !self.notes.contains(id));
        if stale {
            self.selection = Selection::default();
        }
    }

    pub fn select(&mut self, selection: Selection) {
        let known = selection
            .current
            .as_deref()
            .map_or(true, |id| self.notes.contains(id));
        if known {
            self.selection = selection;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// URL for the current selection: `/notes/{position+1}`, plus `/edit` in
    /// edit mode. `None` when nothing (or a vanished note) is selected.
    pub fn route_path(&self) -> Option<String> {
        let id = self.selection.current.as_deref()?;
        let position = self.notes.position(id)?;
        Some(note_path(position, self.selection.edit_mode))
    }
}

pub(crate) fn note_path(position: usize, edit: bool) -> String {
    if edit {
        format!("/notes/{}/edit", position + 1)
    } else {
        format!("/notes/{}", position + 1)
    }
}
