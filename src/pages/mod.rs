mod note_list;
mod write_box;

pub use note_list::NoteList;
pub use write_box::WriteBox;

use crate::auth::begin_login;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, DismissibleAlert, Spinner};
use crate::models::Note;
use crate::state::{AppContext, NoteActions, NoteSync};
use leptos::prelude::*;
use leptos_router::components::{Outlet, A};
use leptos_router::hooks::{use_location, use_navigate};
use log::debug;

/// Shell around every route: header, note sidebar, and the content slot.
///
/// Owns the session side effects (token -> profile -> notes) and keeps the
/// URL in step with the notebook selection.
#[component]
pub fn Layout() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let sync = NoteSync::new(state);

    let navigate = StoredValue::new(use_navigate());
    let location = use_location();

    // Requests must not outlive the shell.
    on_cleanup(move || state.session_tasks.with_value(|g| g.cancel_all()));

    // Profile lookup runs once per token value. Losing the token (logout, or
    // a rejected token) sends the user back to `/`.
    let access_token = Memo::new(move |_| {
        state
            .token
            .with(|t| t.as_ref().map(|t| t.access_token.clone()))
    });
    Effect::new(move |had_token: Option<bool>| {
        let token = access_token.get();
        let has_token = token.is_some();
        if let Some(token) = token {
            sync.fetch_profile(token);
        }
        if let Some(path) = landing_after_token_change(had_token.unwrap_or(false), has_token) {
            debug!("router: session ended -> {path}");
            navigate.with_value(|nav| nav(path, Default::default()));
        }
        has_token
    });

    // Notes are keyed by email, so they load only after the profile resolves.
    let email = Memo::new(move |_| state.profile.with(|p| p.as_ref().map(|p| p.email.clone())));
    Effect::new(move |_| {
        if let Some(email) = email.get() {
            sync.load_notes(email);
        }
    });

    // Notes or selection changed: follow the selection in the URL.
    Effect::new(move |_| {
        let Some(path) = state.notebook.with(|nb| nb.route_path()) else {
            return;
        };
        if location.pathname.get_untracked() != path {
            debug!("router: -> {path}");
            navigate.with_value(|nav| nav(&path, Default::default()));
        }
    });

    provide_context(NoteActions {
        save: Callback::new(move |note: Note| sync.save(note)),
        delete: Callback::new(move |id: String| {
            sync.delete(id);
            // Nothing left to select, so the route effect will not move us.
            if state.notebook.with_untracked(|nb| nb.notes.is_empty()) {
                navigate.with_value(|nav| nav("/notes", Default::default()));
            }
        }),
    });

    let signed_in = move || state.is_signed_in();
    let sidebar_collapsed = state.sidebar_collapsed;

    let on_logout = move |_| state.sign_out();

    let sidebar_class = move || {
        if sidebar_collapsed.get() {
            "hidden"
        } else {
            "flex w-72 shrink-0 flex-col border-r bg-muted/30"
        }
    };

    view! {
        <div id="container" class="flex h-screen flex-col bg-background text-foreground">
            <header class="flex items-center justify-between border-b px-4 py-3">
                <aside class="w-56">
                    <Button
                        attr:id="menu-button"
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Toggle sidebar"
                        on:click=move |_| sidebar_collapsed.update(|c| *c = !*c)
                    >
                        "☰"
                    </Button>
                </aside>

                <div id="app-header" class="text-center">
                    <h1 class="text-2xl font-bold tracking-tight">
                        <A href="/notes">"Lotion"</A>
                    </h1>
                    <h6 id="app-moto" class="text-xs text-muted-foreground">"Like Notion, but worse."</h6>
                </div>

                <aside class="w-56 text-right text-sm">
                    {move || {
                        state.profile.get().map(|p| {
                            view! {
                                <div class="profile">
                                    <span class="email" title=p.name.unwrap_or_default()>{p.email}</span>
                                    <Button
                                        class="log ml-1"
                                        variant=ButtonVariant::Link
                                        size=ButtonSize::Inline
                                        on:click=on_logout
                                    >
                                        "(Log out)"
                                    </Button>
                                </div>
                            }
                        })
                    }}
                </aside>
            </header>

            <div id="main-container" class="flex min-h-0 flex-1">
                <Show when=signed_in fallback=|| ().into_view()>
                    <aside id="sidebar" class=sidebar_class>
                        <header class="flex items-center justify-between border-b px-4 py-3">
                            <div id="notes-list-heading" class="flex items-center gap-2">
                                <h2 class="text-lg font-semibold">"Notes"</h2>
                                <Show when=move || state.notes_loading.get() fallback=|| ().into_view()>
                                    <Spinner label="Loading notes" />
                                </Show>
                            </div>
                            <Button
                                attr:id="new-note-button"
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                attr:aria-label="New note"
                                on:click=move |_| state.add_note()
                            >
                                "+"
                            </Button>
                        </header>
                        <div id="notes-holder" class="flex-1 overflow-y-auto">
                            <NoteList />
                        </div>
                    </aside>
                </Show>

                <main id="write-box" class="flex min-w-0 flex-1 flex-col gap-4 overflow-y-auto p-6">
                    <DismissibleAlert message=state.last_sync_error />
                    <Show when=signed_in fallback=|| view! { <LoginPrompt /> }>
                        <Outlet />
                    </Show>
                </main>
            </div>
        </div>
    }
}

fn landing_after_token_change(had_token: bool, has_token: bool) -> Option<&'static str> {
    (had_token && !has_token).then_some("/")
}

#[component]
fn LoginPrompt() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let client_id = state.config.with_value(|c| c.google_client_id.clone());

    view! {
        <div id="login-button-div" class="flex flex-1 items-center justify-center">
            <Button attr:id="login-button" on:click=move |_| begin_login(&client_id)>
                "Sign in with Google"
            </Button>
        </div>
    }
}

/// Placeholder shown when no note is open.
#[component]
pub fn EmptyState() -> impl IntoView {
    view! {
        <div id="empty" class="flex flex-1 items-center justify-center text-sm text-muted-foreground">
            "Select a note, or create a new one."
        </div>
    }
}

/// Route view for `/`, `/notes` and unknown paths. Landing here closes
/// whatever note was open.
#[component]
pub fn Empty() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    Effect::new(move |_| {
        if state
            .notebook
            .with_untracked(|nb| nb.selection.current.is_some())
        {
            state.notebook.update(|nb| nb.clear_selection());
        }
    });

    view! { <EmptyState /> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_losing_the_token_lands_on_root() {
        assert_eq!(landing_after_token_change(true, false), Some("/"));
    }

    #[test]
    fn test_startup_and_sign_in_stay_put() {
        assert_eq!(landing_after_token_change(false, false), None);
        assert_eq!(landing_after_token_change(false, true), None);
        assert_eq!(landing_after_token_change(true, true), None);
    }
}
