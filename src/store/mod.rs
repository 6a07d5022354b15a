//! Client-side notes collection.
//!
//! Notes are addressed by id. Positions only exist for display order and for
//! the 1-indexed note URLs (see [`notebook`]).

pub(crate) mod notebook;

use crate::models::Note;
use std::collections::HashMap;

pub(crate) use notebook::{Notebook, Selection};

/// Editor artifact for an empty line; never stored.
pub(crate) const EMPTY_PARAGRAPH: &str = "<p><br></p>";

pub(crate) fn strip_empty_paragraphs(body: &str) -> String {
    body.replace(EMPTY_PARAGRAPH, "")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteStore {
    by_id: HashMap<String, Note>,
    order: Vec<String>,
}

impl NoteStore {
    /// Build from a list in display order. Later duplicates of an id are dropped.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut store = Self::default();
        for note in notes {
            if store.by_id.contains_key(&note.id) {
                continue;
            }
            store.order.push(note.id.clone());
            store.by_id.insert(note.id.clone(), note);
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.by_id.get(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }

    pub fn note_at(&self, position: usize) -> Option<&Note> {
        self.order.get(position).and_then(|id| self.by_id.get(id))
    }

    pub fn first_id(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Notes in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn to_vec(&self) -> Vec<Note> {
        self.iter().cloned().collect()
    }

    /// Insert at the front. Returns false (and changes nothing) if the id
    /// already exists.
    pub fn prepend(&mut self, note: Note) -> bool {
        if self.by_id.contains_key(&note.id) {
            return false;
        }
        self.order.insert(0, note.id.clone());
        self.by_id.insert(note.id.clone(), note);
        true
    }

    /// Overwrite the note with the same id, keeping its position.
    /// Unknown ids are ignored.
    pub fn replace(&mut self, note: Note) -> bool {
        match self.by_id.get_mut(&note.id) {
            Some(slot) => {
                *slot = note;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Note> {
        let note = self.by_id.remove(id)?;
        self.order.retain(|x| x != id);
        Some(note)
    }

    /// Resolve a `:noteId` route segment (1-indexed position).
    pub fn note_at_route(&self, param: &str) -> Option<&Note> {
        let n: usize = param.trim().parse().ok()?;
        self.note_at(n.checked_sub(1)?)
    }
}
