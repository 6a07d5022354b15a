pub(crate) mod sync;
pub(crate) mod tasks;

use crate::api::ApiClient;
use crate::auth::take_redirect_token;
use crate::config::EnvConfig;
use crate::models::{Note, OAuthToken, Profile};
use crate::storage::{clear_token_storage, load_token_from_storage, save_token_to_storage};
use crate::store::{Notebook, Selection};
use crate::util::now_when;
use leptos::prelude::*;
use log::info;
use tasks::TaskGuard;

pub(crate) use sync::NoteSync;

/// Application state shared through context.
///
/// Views read the signals directly; writes go through the methods below so
/// session teardown and note bookkeeping stay in one place.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<EnvConfig>,

    /// Session. Only the token is persisted; the profile is re-fetched.
    pub token: RwSignal<Option<OAuthToken>>,
    pub profile: RwSignal<Option<Profile>>,

    /// Notes + selection (the router projects this onto the URL).
    pub notebook: RwSignal<Notebook>,
    pub notes_loading: RwSignal<bool>,

    /// Last failed remote call, shown until dismissed.
    pub last_sync_error: RwSignal<Option<String>>,

    /// Global UI state (not persisted).
    pub sidebar_collapsed: RwSignal<bool>,

    /// Cancelled on logout / shell teardown.
    pub session_tasks: StoredValue<TaskGuard>,
    /// Restarted on every list load so only the newest response lands.
    pub list_tasks: StoredValue<TaskGuard>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let redirected = take_redirect_token();

        let state = Self {
            config: StoredValue::new(config),
            token: RwSignal::new(load_token_from_storage()),
            profile: RwSignal::new(None),
            notebook: RwSignal::new(Notebook::default()),
            notes_loading: RwSignal::new(false),
            last_sync_error: RwSignal::new(None),
            sidebar_collapsed: RwSignal::new(false),
            session_tasks: StoredValue::new(TaskGuard::default()),
            list_tasks: StoredValue::new(TaskGuard::default()),
        };

        if let Some(token) = redirected {
            state.sign_in(token);
        }
        state
    }

    pub fn is_signed_in(&self) -> bool {
        self.profile.with(|p| p.is_some())
    }

    pub fn api_client(&self) -> ApiClient {
        let token = self
            .token
            .with_untracked(|t| t.as_ref().map(|t| t.access_token.clone()));
        self.config.with_value(|c| ApiClient::new(c, token))
    }

    pub fn email_untracked(&self) -> Option<String> {
        self.profile
            .with_untracked(|p| p.as_ref().map(|p| p.email.clone()))
    }

    pub fn sign_in(&self, token: OAuthToken) {
        save_token_to_storage(&token);
        self.token.set(Some(token));
    }

    /// Drop the session: persisted token, profile, notes, and every request
    /// still in flight.
    pub fn sign_out(&self) {
        info!("session: signing out");
        self.session_tasks.with_value(|g| g.cancel_all());
        self.list_tasks.with_value(|g| g.cancel_all());

        clear_token_storage();
        self.token.set(None);
        self.profile.set(None);
        self.notebook.set(Notebook::default());
        self.notes_loading.set(false);
        self.last_sync_error.set(None);
    }

    /// Create a placeholder note locally and open it for editing.
    pub fn add_note(&self) {
        let note = Note::untitled(uuid::Uuid::new_v4().to_string(), now_when());
        self.notebook.update(|nb| {
            nb.add(note);
        });
    }

    pub fn select(&self, selection: Selection) {
        self.notebook.update(|nb| nb.select(selection));
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

/// Callbacks handed to the note views by the layout shell.
#[derive(Clone, Copy)]
pub(crate) struct NoteActions {
    pub save: Callback<Note>,
    pub delete: Callback<String>,
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn token() -> OAuthToken {
        OAuthToken {
            access_token: "ya29.test".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: None,
            scope: None,
        }
    }

    #[wasm_bindgen_test]
    fn test_stored_token_survives_reload() {
        clear_token_storage();
        AppState::new(EnvConfig::default()).sign_in(token());

        let reloaded = AppState::new(EnvConfig::default());
        assert_eq!(reloaded.token.get_untracked(), Some(token()));
        assert!(!reloaded.is_signed_in());
        clear_token_storage();
    }

    #[wasm_bindgen_test]
    fn test_sign_out_clears_session() {
        clear_token_storage();
        let state = AppState::new(EnvConfig::default());
        state.sign_in(token());
        state.profile.set(Some(Profile {
            email: "a@b.com".to_string(),
            name: None,
            picture: None,
        }));
        state.add_note();
        assert!(state.is_signed_in());

        state.sign_out();
        assert!(load_token_from_storage().is_none());
        assert_eq!(state.token.get_untracked(), None);
        assert_eq!(state.profile.get_untracked(), None);
        assert!(!state.is_signed_in());
        assert!(state.notebook.with_untracked(|nb| nb.notes.is_empty()));

        let reloaded = AppState::new(EnvConfig::default());
        assert_eq!(reloaded.token.get_untracked(), None);
        assert!(!reloaded.is_signed_in());
    }
}
