//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the project database pool, the loaded configuration, the command
//! runner used for `git`/`trivy`, the load balancer, and the names of
//! projects whose clone is still running.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::balancer::Balancer;
use crate::config::Config;
use crate::services::command::CommandRunner;
use crate::services::hosting::CloneClaims;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub runner: Arc<dyn CommandRunner>,
    pub balancer: Balancer,
    pub clone_claims: CloneClaims,
}

impl AppState {
    #[must_use]
    pub fn new(pool: SqlitePool, config: Config, runner: Arc<dyn CommandRunner>, balancer: Balancer) -> Self {
        Self { pool, config: Arc::new(config), runner, balancer, clone_claims: CloneClaims::default() }
    }

    /// Directory hosted projects are cloned into.
    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.projects.directory)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
