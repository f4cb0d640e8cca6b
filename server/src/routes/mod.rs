//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the project API, the load-balancer proxy and hosted
//! project files, and stitches them with Leptos SSR rendering under a single
//! Axum router. The landing page is served by Leptos at `/`.

pub mod projects;

use std::path::PathBuf;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::balancer::{self, EndpointStatus};
use crate::services::hosting;
use crate::state::AppState;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// API, proxy and hosted-file routes. Usable without the Leptos frontend.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let hosted: Router = Router::new()
        .fallback_service(ServeDir::new(state.projects_dir()).append_index_html_on_directories(true))
        .layer(middleware::from_fn(hide_dot_paths));

    Router::new()
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .patch(projects::patch_project)
                .delete(projects::delete_project),
        )
        .route("/api/projects/{id}/update", post(projects::update_project))
        .route("/api/projects/{id}/scan", post(projects::scan_project))
        .route("/api/balancer", get(balancer_status))
        .route("/view/{id}", get(projects::view_project))
        .route("/lb", any(balancer::proxy))
        .route("/lb/{*path}", any(balancer::proxy))
        .route("/healthz", get(healthz))
        .nest_service("/projects", hosted)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Leptos SSR frontend merged with the API routes.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section and no `LEPTOS_*` env).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    // Compiled WASM, JS and CSS from cargo-leptos.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

/// Hosted checkouts keep their `.git` directory; never serve it.
async fn hide_dot_paths(req: Request, next: Next) -> Response {
    if hosting::is_hidden_path(req.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

async fn balancer_status(State(state): State<AppState>) -> Json<Vec<EndpointStatus>> {
    Json(state.balancer.snapshot())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
