//! Project service: CRUD for hosted projects and their scan history.
//!
//! DESIGN
//! ======
//! A project row records where a repository was cloned from and where it sits
//! on disk. Scans are append-only; the newest row per project is the one the
//! API reports. Deleting a project cascades to its scans but leaves the
//! checkout on disk.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::services::scanning::ScanResult;

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub repo_url: String,
    pub path: String,
}

type ProjectTuple = (i64, String, String, String);

fn from_tuple((id, name, repo_url, path): ProjectTuple) -> Project {
    Project { id, name, repo_url, path }
}

/// Insert a project and return its id.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn add_project(pool: &SqlitePool, name: &str, repo_url: &str, path: &str) -> Result<i64, ProjectError> {
    let result = sqlx::query("INSERT INTO projects (name, repo_url, path) VALUES (?, ?, ?)")
        .bind(name)
        .bind(repo_url)
        .bind(path)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Fetch one project.
///
/// # Errors
///
/// Returns `NotFound` if no project has `id`.
pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Project, ProjectError> {
    sqlx::query_as::<_, ProjectTuple>("SELECT id, name, repo_url, path FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(from_tuple)
        .ok_or(ProjectError::NotFound(id))
}

/// List all projects in creation order.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>, ProjectError> {
    let rows = sqlx::query_as::<_, ProjectTuple>("SELECT id, name, repo_url, path FROM projects ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(from_tuple).collect())
}

/// Overwrite name, url and path of an existing project.
///
/// # Errors
///
/// Returns `NotFound` if no row matched `project.id`.
pub async fn update_project(pool: &SqlitePool, project: &Project) -> Result<(), ProjectError> {
    let result = sqlx::query("UPDATE projects SET name = ?, repo_url = ?, path = ? WHERE id = ?")
        .bind(&project.name)
        .bind(&project.repo_url)
        .bind(&project.path)
        .bind(project.id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ProjectError::NotFound(project.id));
    }
    Ok(())
}

/// Delete a project and its scan history.
///
/// # Errors
///
/// Returns `NotFound` if no row matched `id`.
pub async fn delete_project(pool: &SqlitePool, id: i64) -> Result<(), ProjectError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ProjectError::NotFound(id));
    }
    Ok(())
}

/// Append a scan result.
///
/// # Errors
///
/// Returns a database error if the insert fails, including when the project
/// no longer exists.
pub async fn record_scan(pool: &SqlitePool, scan: &ScanResult) -> Result<(), ProjectError> {
    sqlx::query(
        "INSERT INTO scans (project_id, scan_date, vuln_count, severity, recommended, error, raw_output)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(scan.project_id)
    .bind(&scan.scan_date)
    .bind(scan.vuln_count)
    .bind(&scan.severity)
    .bind(scan.recommended.as_deref())
    .bind(scan.error.as_deref())
    .bind(&scan.raw_output)
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent scan for a project, if any.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn latest_scan(pool: &SqlitePool, project_id: i64) -> Result<Option<ScanResult>, ProjectError> {
    let row = sqlx::query_as::<_, (String, i64, String, Option<String>, Option<String>, String)>(
        "SELECT scan_date, vuln_count, severity, recommended, error, raw_output
         FROM scans
         WHERE project_id = ?
         ORDER BY id DESC
         LIMIT 1",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(scan_date, vuln_count, severity, recommended, error, raw_output)| ScanResult {
        project_id,
        scan_date,
        vuln_count,
        raw_output,
        severity,
        recommended,
        error,
    }))
}
