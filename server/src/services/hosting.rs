//! Project hosting: clone and refresh git repositories on disk.
//!
//! DESIGN
//! ======
//! Each project lives in `<projects dir>/<name>`. The name doubles as a path
//! component, so it is restricted to a safe character set before anything
//! touches the filesystem. Hosted files are served read-only by the router.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::services::command::CommandRunner;

#[cfg(test)]
#[path = "hosting_test.rs"]
mod tests;

const GIT: &str = "git";
const MAX_PROJECT_NAME_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum HostingError {
    #[error("invalid project name: {0}")]
    InvalidName(String),
    #[error("invalid repository url: {0}")]
    InvalidRepoUrl(String),
    #[error("project directory already exists: {0}")]
    AlreadyExists(String),
    #[error("git failed: {stderr}")]
    Git { stderr: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the projects directory if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn initialize(dir: &Path) -> Result<(), HostingError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "created projects directory");
    }
    Ok(())
}

/// Check that `name` is usable as a single directory name.
///
/// # Errors
///
/// Returns `InvalidName` for empty, overlong, hidden, or non-portable names.
pub fn validate_project_name(name: &str) -> Result<(), HostingError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_PROJECT_NAME_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid { Ok(()) } else { Err(HostingError::InvalidName(name.to_owned())) }
}

/// Reject urls that are empty or could be read as a git option.
///
/// # Errors
///
/// Returns `InvalidRepoUrl` for blank urls, urls with whitespace, or urls
/// starting with `-`.
pub fn validate_repo_url(repo_url: &str) -> Result<(), HostingError> {
    let trimmed = repo_url.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.chars().any(char::is_whitespace) {
        return Err(HostingError::InvalidRepoUrl(repo_url.to_owned()));
    }
    Ok(())
}

/// Clone `repo_url` into `<dir>/<name>` and return the project path.
///
/// # Errors
///
/// Returns an error if the inputs are invalid, the target directory already
/// holds files, or `git clone` fails.
pub async fn clone_project(
    runner: &dyn CommandRunner,
    dir: &Path,
    name: &str,
    repo_url: &str,
) -> Result<PathBuf, HostingError> {
    validate_project_name(name)?;
    validate_repo_url(repo_url)?;

    let project_path = dir.join(name);
    if dir_has_entries(&project_path)? {
        return Err(HostingError::AlreadyExists(project_path.display().to_string()));
    }

    info!(repo_url, path = %project_path.display(), "cloning project");
    let args = vec![
        "clone".to_owned(),
        "--".to_owned(),
        repo_url.trim().to_owned(),
        project_path.display().to_string(),
    ];
    let output = runner.run(GIT, &args).await?;
    if !output.success {
        return Err(HostingError::Git { stderr: output.stderr.trim().to_owned() });
    }

    Ok(project_path)
}

/// Pull the latest changes for the checkout at `path`.
///
/// # Errors
///
/// Returns an error if `git pull` cannot run or exits non-zero.
pub async fn update_project(runner: &dyn CommandRunner, path: &Path) -> Result<(), HostingError> {
    let args = vec!["-C".to_owned(), path.display().to_string(), "pull".to_owned()];
    let output = runner.run(GIT, &args).await?;
    if !output.success {
        return Err(HostingError::Git { stderr: output.stderr.trim().to_owned() });
    }

    if output.stdout.contains("Already up to date") {
        info!(path = %path.display(), "repository already up to date");
    } else {
        info!(path = %path.display(), "repository updated");
    }
    Ok(())
}

/// Remove a checkout left behind by a project that failed to register.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub async fn remove_checkout(path: &Path) -> Result<(), HostingError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            info!(path = %path.display(), "removed checkout");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Whether a path under the hosted root names a dot file or dot directory
/// (such as `.git/config`). Percent-encoded dots count too.
#[must_use]
pub fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.') || segment.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}

/// Project names with a clone in flight.
///
/// Two requests for the same name would otherwise both see an empty target
/// directory and race inside `git clone`.
#[derive(Clone, Default)]
pub struct CloneClaims {
    names: Arc<Mutex<HashSet<String>>>,
}

impl CloneClaims {
    /// Claim `name` until the returned guard drops. `None` if already claimed.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<CloneClaim> {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if !names.insert(name.to_owned()) {
            return None;
        }
        Some(CloneClaim { names: Arc::clone(&self.names), name: name.to_owned() })
    }
}

pub struct CloneClaim {
    names: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for CloneClaim {
    fn drop(&mut self) {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
    }
}

/// URL path under which the files of the project at `path` are served.
#[must_use]
pub fn hosted_url(path: &str) -> Option<String> {
    let base = Path::new(path).file_name()?.to_str()?;
    Some(format!("/projects/{base}/"))
}

fn dir_has_entries(path: &Path) -> Result<bool, std::io::Error> {
    match std::fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_some()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
