use crate::models::Note;
use crate::state::AppContext;
use crate::store::Selection;
use crate::util::{format_when, plain_text_preview};
use leptos::prelude::*;

const PREVIEW_CHARS: usize = 60;

#[component]
pub fn NoteList() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let notes = Memo::new(move |_| state.notebook.with(|nb| nb.notes.to_vec()));

    view! {
        <Show
            when=move || notes.with(|n| !n.is_empty())
            fallback=|| view! { <div id="no-note" class="px-4 py-6 text-sm text-muted-foreground">"No Note Yet"</div> }
        >
            <ul class="flex flex-col">
                // Keyed on the whole note so a saved title/body re-renders its row.
                <For
                    each=move || notes.get()
                    key=|n| n.clone()
                    children=move |note| view! { <NoteListItem note /> }
                />
            </ul>
        </Show>
    }
}

#[component]
fn NoteListItem(note: Note) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let id = StoredValue::new(note.id.clone());
    let is_selected = move || state.notebook.with(|nb| id.with_value(|id| nb.selection.is(id)));

    let item_class = move || {
        if is_selected() {
            "cursor-pointer border-b px-4 py-3 bg-accent text-accent-foreground"
        } else {
            "cursor-pointer border-b px-4 py-3 hover:bg-accent/50"
        }
    };

    let preview = plain_text_preview(&note.body, PREVIEW_CHARS);
    let has_preview = !preview.is_empty();

    view! {
        <li
            class=item_class
            aria-current=move || is_selected().then_some("true")
            on:click=move |_| state.select(Selection::read(id.get_value()))
        >
            <h3 class="truncate text-sm font-medium">{note.title}</h3>
            <small class="text-xs text-muted-foreground">{format_when(&note.when)}</small>
            {has_preview.then(|| view! { <p class="mt-1 truncate text-xs text-muted-foreground">{preview}</p> })}
        </li>
    }
}
