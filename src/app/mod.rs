use crate::config::EnvConfig;
use crate::pages::{Empty, EmptyState, Layout, WriteBox};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{ParentRoute, Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(config)));

    // Every route renders inside the shell; the shell decides between the
    // login prompt and the routed content.
    view! {
        <Router>
            <Routes fallback=|| view! { <EmptyState /> }>
                <ParentRoute path=path!("") view=Layout>
                    <Route path=path!("") view=Empty />
                    <Route path=path!("notes") view=Empty />
                    <Route path=path!("notes/:note_id") view=|| view! { <WriteBox edit=false /> } />
                    <Route path=path!("notes/:note_id/edit") view=|| view! { <WriteBox edit=true /> } />
                    <Route path=path!("*any") view=Empty />
                </ParentRoute>
            </Routes>
        </Router>
    }
}
