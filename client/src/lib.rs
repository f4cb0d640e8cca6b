//! SyncX web client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos components rendered on the server by `leptos_axum` and hydrated in
//! the browser from the `hydrate` entry point below. The UI is presentational:
//! a landing page and a sidebar, with no client-side state.

pub mod app;
pub mod components;
pub mod pages;

/// WASM entry point. Hydrates the server-rendered document body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use leptos::prelude::*;

    /// Render a view to an HTML string inside a throwaway reactive owner.
    pub fn render<F, V>(f: F) -> String
    where
        F: FnOnce() -> V,
        V: RenderHtml,
    {
        let owner = Owner::new();
        owner.with(|| f().to_html())
    }

    /// Opening tags named `tag` in document order, e.g. `<a href="/" class="x">`.
    /// Attribute order is left to the renderer, so match attributes one by one.
    pub fn opening_tags<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
        let open = format!("<{tag} ");
        let mut tags = Vec::new();
        let mut rest = html;
        while let Some(start) = rest.find(&open) {
            let Some(len) = rest[start..].find('>') else { break };
            tags.push(&rest[start..=start + len]);
            rest = &rest[start + len + 1..];
        }
        tags
    }
}
