//! Application shell and router.
//!
//! ARCHITECTURE
//! ============
//! `shell` renders the full HTML document during SSR. `App` is the layout:
//! the navigation sidebar on the left and the routed page on the right. Only
//! `/` is routed here; the section links point at routes served elsewhere.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::navigation::Navigation;
use crate::pages::home::HomePage;

/// HTML document wrapper used by the server for SSR.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root component: sidebar plus routed main content.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/syncx.css"/>
        <Title text="SyncX"/>
        <Router>
            <div class="app-layout">
                <Navigation/>
                <main class="app-layout__main">
                    <Routes fallback=|| view! { <NotFound/> }>
                        <Route path=path!("/") view=HomePage/>
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1 class="not-found__title">"Page not found"</h1>
            <a class="not-found__link" href="/">"Back to home"</a>
        </div>
    }
}
