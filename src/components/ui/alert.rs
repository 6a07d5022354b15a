use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative flex w-full items-start gap-3 rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "flex-1 text-sm leading-relaxed"}
}

pub use components::*;

/// Error banner with a close button; clears `message` when dismissed.
#[component]
pub fn DismissibleAlert(message: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(|m| m.is_some()) fallback=|| ().into_view()>
            <Alert class="border-destructive/30 bg-destructive/5" attr:role="alert">
                <AlertDescription class="text-destructive">
                    {move || message.get().unwrap_or_default()}
                </AlertDescription>
                <button
                    class="text-destructive/70 hover:text-destructive"
                    aria-label="Dismiss"
                    on:click=move |_| message.set(None)
                >
                    <X class="size-4" />
                </button>
            </Alert>
        </Show>
    }
}
