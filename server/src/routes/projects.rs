//! Project hosting routes.

use std::path::Path as FsPath;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::services::hosting::{self, HostingError};
use crate::services::project::{self, Project, ProjectError};
use crate::services::scanning::{self, ScanFailure, ScanResult};
use crate::state::AppState;

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_result: Option<ScanResult>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repo_url: String,
}

pub(crate) fn project_error_to_status(err: ProjectError) -> StatusCode {
    match err {
        ProjectError::NotFound(_) => StatusCode::NOT_FOUND,
        ProjectError::Database(e) => {
            error!(error = %e, "project query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn hosting_error_to_status(err: HostingError) -> StatusCode {
    match err {
        HostingError::InvalidName(_) | HostingError::InvalidRepoUrl(_) => StatusCode::BAD_REQUEST,
        HostingError::AlreadyExists(_) => StatusCode::CONFLICT,
        HostingError::Git { stderr } => {
            warn!(%stderr, "git command failed");
            StatusCode::BAD_GATEWAY
        }
        HostingError::Io(e) => {
            error!(error = %e, "hosting io failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn with_latest_scan(state: &AppState, project: Project) -> Result<ProjectResponse, StatusCode> {
    let scan_result = project::latest_scan(&state.pool, project.id)
        .await
        .map_err(project_error_to_status)?;
    Ok(ProjectResponse { project, scan_result })
}

/// `GET /api/projects`: list projects with their latest scan.
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>, StatusCode> {
    let projects = project::list_projects(&state.pool)
        .await
        .map_err(project_error_to_status)?;

    let mut out = Vec::with_capacity(projects.len());
    for p in projects {
        out.push(with_latest_scan(&state, p).await?);
    }
    Ok(Json(out))
}

/// `GET /api/projects/{id}`: fetch one project.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>, StatusCode> {
    let p = project::get_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(with_latest_scan(&state, p).await?))
}

/// `POST /api/projects`: clone a repository and register it.
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<ProjectResponse>), StatusCode> {
    let name = body.name.trim();
    let repo_url = body.repo_url.trim();
    if name.is_empty() || repo_url.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let Some(_claim) = state.clone_claims.claim(name) else {
        info!(name, "clone already in progress");
        return Err(StatusCode::CONFLICT);
    };

    let checkout = hosting::clone_project(state.runner.as_ref(), &state.projects_dir(), name, repo_url)
        .await
        .map_err(hosting_error_to_status)?;
    let path = checkout.display().to_string();

    let id = match project::add_project(&state.pool, name, repo_url, &path).await {
        Ok(id) => id,
        Err(e) => {
            if let Err(rm) = hosting::remove_checkout(&checkout).await {
                warn!(path, error = %rm, "failed to remove checkout of unregistered project");
            }
            return Err(project_error_to_status(e));
        }
    };
    info!(id, name, "project added");

    if state.config.scanning.auto_scan_on_add {
        if scanning::is_trivy_installed(state.runner.as_ref()) {
            spawn_auto_scan(state.clone(), id, path.clone());
        } else {
            info!(id, "auto-scan skipped: trivy not installed");
        }
    }

    let created = Project { id, name: name.to_owned(), repo_url: repo_url.to_owned(), path };
    Ok((StatusCode::CREATED, Json(ProjectResponse { project: created, scan_result: None })))
}

fn spawn_auto_scan(state: AppState, id: i64, path: String) {
    tokio::spawn(async move {
        let result = match scanning::scan_project(state.runner.as_ref(), id, FsPath::new(&path)).await {
            Ok(result) => result,
            Err(ScanFailure { result, error }) => {
                warn!(id, %error, "auto-scan failed");
                result
            }
        };
        if let Err(e) = project::record_scan(&state.pool, &result).await {
            warn!(id, error = %e, "failed to record auto-scan");
        }
    });
}

#[derive(Debug, Deserialize)]
pub struct PatchProjectBody {
    pub name: Option<String>,
    pub repo_url: Option<String>,
}

/// `PATCH /api/projects/{id}`: edit the display name or tracked repository url.
///
/// The checkout path is fixed at clone time and does not follow the name.
pub async fn patch_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PatchProjectBody>,
) -> Result<Json<ProjectResponse>, StatusCode> {
    let mut p = project::get_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;

    if let Some(name) = body.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }
        name.clone_into(&mut p.name);
    }
    if let Some(repo_url) = body.repo_url.as_deref().map(str::trim) {
        hosting::validate_repo_url(repo_url).map_err(hosting_error_to_status)?;
        repo_url.clone_into(&mut p.repo_url);
    }

    project::update_project(&state.pool, &p)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(with_latest_scan(&state, p).await?))
}

/// `DELETE /api/projects/{id}`: remove a project record. Files stay on disk.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    project::delete_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;
    info!(id, "project deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/projects/{id}/update`: pull the latest changes.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let p = project::get_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;
    hosting::update_project(state.runner.as_ref(), FsPath::new(&p.path))
        .await
        .map_err(hosting_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/projects/{id}/scan`: run Trivy and record the result.
///
/// A failed scan still answers 200 with the partial result; a missing Trivy
/// answers with installation instructions instead.
pub async fn scan_project(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, StatusCode> {
    let p = project::get_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;

    if !scanning::is_trivy_installed(state.runner.as_ref()) {
        return Ok(Json(serde_json::json!({
            "error": "Trivy is not installed",
            "instructions": scanning::install_instructions(),
        }))
        .into_response());
    }

    let result = match scanning::scan_project(state.runner.as_ref(), p.id, FsPath::new(&p.path)).await {
        Ok(result) => result,
        Err(ScanFailure { result, error }) => {
            warn!(id, %error, "scan failed");
            result
        }
    };

    if let Err(e) = project::record_scan(&state.pool, &result).await {
        warn!(id, error = %e, "failed to record scan");
    }
    Ok(Json(result).into_response())
}

/// `GET /view/{id}`: redirect to the project's hosted files.
pub async fn view_project(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect, StatusCode> {
    let p = project::get_project(&state.pool, id)
        .await
        .map_err(project_error_to_status)?;
    let url = hosting::hosted_url(&p.path).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Redirect::to(&url))
}
