use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::models::Note;
use crate::pages::EmptyState;
use crate::state::{AppContext, NoteActions};
use crate::store::{Selection, EMPTY_PARAGRAPH};
use crate::util::{format_when, when_input_value};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;
use log::debug;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteRouteParams {
    pub note_id: Option<String>,
}

fn confirm_delete() -> bool {
    window()
        .confirm_with_message("Are you sure?")
        .unwrap_or(false)
}

/// Route view for `/notes/:note_id` and `/notes/:note_id/edit`.
///
/// The segment is a 1-based position in the note list. Visiting it directly
/// selects that note once it is loaded; an unknown position shows the empty
/// placeholder.
#[component]
pub fn WriteBox(edit: bool) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let params = use_params::<NoteRouteParams>();

    let note_param = Memo::new(move |_| params.get().ok().and_then(|p| p.note_id));
    let note = Memo::new(move |_| {
        let param = note_param.get()?;
        state
            .notebook
            .with(|nb| nb.notes.note_at_route(&param).cloned())
    });

    // Deep links: adopt the note under the URL. Only when the URL itself moved
    // (or nothing is selected yet), so a fresh selection elsewhere is not undone
    // before the router catches up with it.
    Effect::new(move |prev: Option<Option<String>>| {
        let param = note_param.get();
        let resolved = note.with(|n| n.as_ref().map(|n| n.id.clone()));

        if let Some(id) = resolved {
            let wanted = if edit {
                Selection::edit(id)
            } else {
                Selection::read(id)
            };
            let current = state.notebook.with_untracked(|nb| nb.selection.clone());
            let param_changed = prev.as_ref() != Some(&param);
            if current != wanted && (param_changed || current.current.is_none()) {
                debug!("router: selecting note from url {param:?}");
                state.select(wanted);
            }
        }
        param
    });

    let note_id = Memo::new(move |_| note.with(|n| n.as_ref().map(|n| n.id.clone())));

    move || {
        if edit {
            // Editor is rebuilt per note, not per keystroke upstream.
            note_id.get().and_then(|_| note.get_untracked()).map_or_else(
                || view! { <EmptyState /> }.into_any(),
                |note| view! { <NoteEditor note /> }.into_any(),
            )
        } else {
            note.get().map_or_else(
                || view! { <EmptyState /> }.into_any(),
                |note| view! { <NoteReader note /> }.into_any(),
            )
        }
    }
}

#[component]
fn NoteReader(note: Note) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let actions = expect_context::<NoteActions>();
    let id = StoredValue::new(note.id.clone());

    let on_delete = move |_| {
        if confirm_delete() {
            actions.delete.run(id.get_value());
        }
    };

    view! {
        <article class="note-reader flex flex-col gap-4">
            <div class="flex items-start justify-between gap-4">
                <div class="min-w-0">
                    <h1 class="truncate text-3xl font-bold">{note.title}</h1>
                    <p class="text-sm text-muted-foreground">{format_when(&note.when)}</p>
                </div>
                <div class="flex shrink-0 gap-2">
                    <Button
                        attr:id="edit-button"
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| state.select(Selection::edit(id.get_value()))
                    >
                        "Edit"
                    </Button>
                    <Button
                        attr:id="delete-button"
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        on:click=on_delete
                    >
                        "Delete"
                    </Button>
                </div>
            </div>
            <div class="note-body prose max-w-none" inner_html=note.body></div>
        </article>
    }
}

#[component]
fn NoteEditor(note: Note) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let actions = expect_context::<NoteActions>();

    let id = StoredValue::new(note.id.clone());
    let original_when = StoredValue::new(when_input_value(&note.when));

    let title = RwSignal::new(note.title.clone());
    let when = RwSignal::new(original_when.get_value());
    let body_ref = NodeRef::<html::Div>::new();

    let initial_body = if note.body.is_empty() {
        EMPTY_PARAGRAPH.to_string()
    } else {
        note.body.clone()
    };

    // The stored note is the base so fields not on this form survive.
    let save = move || {
        let Some(mut updated) = state
            .notebook
            .with_untracked(|nb| id.with_value(|id| nb.notes.get(id).cloned()))
        else {
            return;
        };

        updated.title = title.get_untracked();
        if let Some(el) = body_ref.get_untracked() {
            updated.body = el.inner_html();
        }
        let new_when = when.get_untracked();
        if !new_when.is_empty() && original_when.with_value(|w| *w != new_when) {
            updated.when = new_when;
        }
        actions.save.run(updated);
    };

    let handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let is_meta = ev.meta_key() || ev.ctrl_key();
        if is_meta && ev.key().to_lowercase() == "s" {
            ev.prevent_default();
            save();
        }
    });
    on_cleanup(move || handle.remove());

    let on_delete = move |_| {
        if confirm_delete() {
            actions.delete.run(id.get_value());
        }
    };

    view! {
        <div class="note-editor flex flex-col gap-4">
            <div class="flex items-center gap-2">
                <Input class="text-lg font-semibold" id="title-input" placeholder="Title" autofocus=true bind_value=title />
                <Input class="w-56" r#type="datetime-local" id="when-input" bind_value=when />
            </div>
            <div
                id="body-editor"
                class="min-h-64 rounded-md border p-3 outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
                contenteditable="true"
                node_ref=body_ref
                inner_html=initial_body
            ></div>
            <div class="flex gap-2">
                <Button attr:id="save-button" size=ButtonSize::Sm on:click=move |_| save()>
                    "Save"
                </Button>
                <Button
                    attr:id="delete-button"
                    variant=ButtonVariant::Destructive
                    size=ButtonSize::Sm
                    on:click=on_delete
                >
                    "Delete"
                </Button>
            </div>
        </div>
    }
}
