mod balancer;
mod config;
mod db;
mod routes;
mod services;
mod state;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use services::command::SystemRunner;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config_path = std::env::var("SYNCX_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.into());
    let mut cfg = config::load_config(Path::new(&config_path)).expect("failed to load configuration");
    cfg.apply_env();

    let pool = db::init_pool(&cfg.database.path)
        .await
        .expect("database init failed");

    services::hosting::initialize(Path::new(&cfg.projects.directory))
        .expect("failed to initialize projects directory");

    let balancer = balancer::Balancer::new(&cfg.balancer.endpoints).expect("failed to initialize load balancer");
    let _health = balancer.spawn_health_checker(Duration::from_secs(cfg.balancer.check_interval_secs.max(1)));

    let addr = cfg.listen_addr();
    let state = state::AppState::new(pool, cfg, Arc::new(SystemRunner), balancer);

    // Serve the API alone when the Leptos site configuration is unavailable.
    let app = match routes::app(state.clone()) {
        Ok(app) => app,
        Err(e) => {
            tracing::warn!(error = %e, "leptos frontend disabled, serving API only");
            routes::api_routes(state)
        }
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "syncx listening");
    axum::serve(listener, app).await.expect("server failed");
}
