use crate::api::{ApiError, ApiResult};
use crate::auth::fetch_profile;
use crate::models::{DeleteNoteRequest, Note, SaveNoteRequest};
use crate::state::tasks::Ticket;
use crate::state::AppState;
use crate::store::Notebook;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum SyncOp {
    #[strum(serialize = "fetch profile")]
    FetchProfile,
    #[strum(serialize = "load notes")]
    ListNotes,
    #[strum(serialize = "save note")]
    SaveNote,
    #[strum(serialize = "delete note")]
    DeleteNote,
}

/// Result of a remote call, as seen by the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    Synced,
    Failed(String),
}

impl SyncOutcome {
    pub fn from_result<T>(op: SyncOp, result: &ApiResult<T>) -> Self {
        match result {
            Ok(_) => Self::Synced,
            Err(e) => Self::Failed(format!("Could not {op}: {e}")),
        }
    }
}

/// Replace the local notes with a list response. A failed load leaves the
/// collection as it was.
pub(crate) fn apply_list_result(nb: &mut Notebook, result: ApiResult<Vec<Note>>) -> SyncOutcome {
    let outcome = SyncOutcome::from_result(SyncOp::ListNotes, &result);
    if let Ok(notes) = result {
        info!("{}: {} notes", SyncOp::ListNotes, notes.len());
        nb.replace_all(notes);
    }
    outcome
}

/// Store an edit locally and build the upsert for it.
///
/// `None` means there is nothing to send: the note is gone, or nobody is
/// signed in (the local edit is kept either way).
pub(crate) fn apply_save(nb: &mut Notebook, note: Note, email: Option<&str>) -> Option<SaveNoteRequest> {
    let saved = nb.save(note)?;
    email.map(|email| SaveNoteRequest::new(&saved, email))
}

/// Remove a note locally and build the remote delete for it.
pub(crate) fn apply_delete(nb: &mut Notebook, id: &str, email: Option<&str>) -> Option<DeleteNoteRequest> {
    let removed = nb.delete(id)?;
    email.map(|email| DeleteNoteRequest {
        email: email.to_string(),
        id: removed.id,
    })
}

/// Drives every remote call the app makes.
///
/// Local state is always updated first (optimistic); the remote outcome is
/// logged and, on failure, surfaced through `AppState::last_sync_error`.
/// Results that arrive after logout or a newer list request are dropped.
#[derive(Clone, Copy)]
pub(crate) struct NoteSync {
    state: AppState,
}

impl NoteSync {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn session_ticket(&self) -> Ticket {
        self.state.session_tasks.with_value(|g| g.ticket())
    }

    fn record(&self, op: SyncOp, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Synced => debug!("{op}: ok"),
            SyncOutcome::Failed(message) => {
                warn!("{message}");
                self.state.last_sync_error.set(Some(message));
            }
        }
    }

    /// Resolve the profile for `access_token`. Failure leaves the user signed
    /// out; a rejected token is also forgotten.
    pub fn fetch_profile(&self, access_token: String) {
        let ticket = self.session_ticket();
        let userinfo_url = self.state.config.with_value(|c| c.userinfo_url.clone());
        let state = self.state;

        spawn_local(async move {
            let result = fetch_profile(&userinfo_url, &access_token).await;
            if !ticket.is_current() {
                debug!("{}: dropped stale response", SyncOp::FetchProfile);
                return;
            }

            match result {
                Ok(profile) => {
                    info!("session: signed in as {}", profile.email);
                    state.profile.set(Some(profile));
                }
                Err(ApiError::Unauthorized) => {
                    warn!("{}: token rejected, clearing session", SyncOp::FetchProfile);
                    state.sign_out();
                }
                Err(e) => warn!("{}: {e}", SyncOp::FetchProfile),
            }
        });
    }

    /// Replace the local notes with the server's list for `email`.
    pub fn load_notes(&self, email: String) {
        let session = self.session_ticket();
        let latest = self.state.list_tasks.with_value(|g| g.restart());
        let client = self.state.api_client();
        let s2 = *self;

        self.state.notes_loading.set(true);
        spawn_local(async move {
            let result = client.list_notes(&email).await;
            if !session.is_current() || !latest.is_current() {
                debug!("{}: dropped stale response", SyncOp::ListNotes);
                return;
            }
            s2.state.notes_loading.set(false);

            let Some(outcome) = s2
                .state
                .notebook
                .try_update(|nb| apply_list_result(nb, result))
            else {
                return;
            };
            s2.record(SyncOp::ListNotes, outcome);
        });
    }

    /// Store `note` locally, leave edit mode, then upsert it remotely.
    pub fn save(&self, note: Note) {
        let email = self.state.email_untracked();
        let request = self
            .state
            .notebook
            .try_update(|nb| apply_save(nb, note, email.as_deref()))
            .flatten();
        let Some(request) = request else {
            debug!("{}: nothing to send", SyncOp::SaveNote);
            return;
        };

        let ticket = self.session_ticket();
        let client = self.state.api_client();
        let s2 = *self;
        spawn_local(async move {
            let result = client.save_note(&request).await;
            if !ticket.is_current() {
                return;
            }
            if let Ok(body) = &result {
                debug!("{}: {body}", SyncOp::SaveNote);
            }
            s2.record(SyncOp::SaveNote, SyncOutcome::from_result(SyncOp::SaveNote, &result));
        });
    }

    /// Remove the note locally, then delete it remotely.
    pub fn delete(&self, id: String) {
        let email = self.state.email_untracked();
        let request = self
            .state
            .notebook
            .try_update(|nb| apply_delete(nb, &id, email.as_deref()))
            .flatten();
        let Some(request) = request else {
            debug!("{}: nothing to send", SyncOp::DeleteNote);
            return;
        };

        let ticket = self.session_ticket();
        let client = self.state.api_client();
        let s2 = *self;
        spawn_local(async move {
            let result = client.delete_note(&request).await;
            if !ticket.is_current() {
                return;
            }
            if let Ok(body) = &result {
                debug!("{}: {body}", SyncOp::DeleteNote);
            }
            s2.record(SyncOp::DeleteNote, SyncOutcome::from_result(SyncOp::DeleteNote, &result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_names_read_as_verbs() {
        assert_eq!(SyncOp::ListNotes.to_string(), "load notes");
        assert_eq!(SyncOp::DeleteNote.to_string(), "delete note");
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: ApiResult<()> = Ok(());
        assert_eq!(SyncOutcome::from_result(SyncOp::SaveNote, &ok), SyncOutcome::Synced);

        let err: ApiResult<()> = Err(ApiError::Http {
            ctx: "Save note",
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(
            SyncOutcome::from_result(SyncOp::SaveNote, &err),
            SyncOutcome::Failed("Could not save note: Save note failed (502): bad gateway".to_string())
        );
    }

    #[test]
    fn test_outcome_for_network_failure() {
        let err: ApiResult<Vec<Note>> = Err(ApiError::Network("offline".to_string()));
        assert_eq!(
            SyncOutcome::from_result(SyncOp::ListNotes, &err),
            SyncOutcome::Failed("Could not load notes: network error: offline".to_string())
        );
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            title: id.to_uppercase(),
            body: body.to_string(),
            when: "2024-01-01T10:00".to_string(),
        }
    }

    fn notebook(ids: &[&str]) -> Notebook {
        let mut nb = Notebook::default();
        nb.replace_all(ids.iter().map(|id| note(id, "")).collect());
        nb
    }

    #[test]
    fn test_failed_list_load_keeps_local_notes() {
        let mut nb = notebook(&["a", "b"]);
        nb.select(crate::store::Selection::read("b"));
        let before = nb.clone();

        let outcome = apply_list_result(&mut nb, Err(ApiError::Network("offline".to_string())));
        assert_eq!(
            outcome,
            SyncOutcome::Failed("Could not load notes: network error: offline".to_string())
        );
        assert_eq!(nb, before);
    }

    #[test]
    fn test_empty_list_load_replaces_local_notes() {
        let mut nb = notebook(&["a", "b"]);
        nb.select(crate::store::Selection::read("a"));

        assert_eq!(apply_list_result(&mut nb, Ok(vec![])), SyncOutcome::Synced);
        assert!(nb.notes.is_empty());
        assert_eq!(nb.route_path(), None);
    }

    #[test]
    fn test_save_of_missing_note_sends_nothing() {
        let mut nb = notebook(&["a"]);
        let before = nb.clone();
        assert_eq!(apply_save(&mut nb, note("gone", "<p>x</p>"), Some("a@b.com")), None);
        assert_eq!(nb, before);
    }

    #[test]
    fn test_save_sends_stripped_body() {
        let mut nb = notebook(&["a"]);
        let request = apply_save(&mut nb, note("a", "<p>Milk</p><p><br></p>"), Some("a@b.com"))
            .expect("known note should produce an upsert");
        assert_eq!(request.id, "a");
        assert_eq!(request.body, "<p>Milk</p>");
        assert_eq!(request.email, "a@b.com");
        assert_eq!(nb.notes.get("a").map(|n| n.body.as_str()), Some("<p>Milk</p>"));
    }

    #[test]
    fn test_save_without_profile_is_kept_locally() {
        let mut nb = notebook(&["a"]);
        assert_eq!(apply_save(&mut nb, note("a", "<p>local</p>"), None), None);
        assert_eq!(nb.notes.get("a").map(|n| n.body.as_str()), Some("<p>local</p>"));
    }

    #[test]
    fn test_failed_save_is_not_rolled_back() {
        let mut nb = notebook(&["a"]);
        let request = apply_save(&mut nb, note("a", "<p>edited</p>"), Some("a@b.com"));
        assert!(request.is_some());

        let err: ApiResult<serde_json::Value> = Err(ApiError::Network("offline".to_string()));
        assert!(matches!(
            SyncOutcome::from_result(SyncOp::SaveNote, &err),
            SyncOutcome::Failed(_)
        ));
        assert_eq!(nb.notes.get("a").map(|n| n.body.as_str()), Some("<p>edited</p>"));
    }

    #[test]
    fn test_delete_removes_locally_and_targets_note() {
        let mut nb = notebook(&["a", "b"]);
        let request = apply_delete(&mut nb, "b", Some("a@b.com"));
        assert_eq!(
            request,
            Some(DeleteNoteRequest {
                email: "a@b.com".to_string(),
                id: "b".to_string(),
            })
        );
        assert!(!nb.notes.contains("b"));

        let before = nb.clone();
        assert_eq!(apply_delete(&mut nb, "b", Some("a@b.com")), None);
        assert_eq!(nb, before);
    }
}
