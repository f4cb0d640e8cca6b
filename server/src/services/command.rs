//! External command execution seam.
//!
//! DESIGN
//! ======
//! Hosting shells out to `git` and scanning to `trivy`. Both go through
//! `CommandRunner` so tests substitute a fake instead of touching the system.

use std::path::PathBuf;

use async_trait::async_trait;

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, like a shell's `2>&1`.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;

    /// Whether `program` can be executed.
    fn is_installed(&self, program: &str) -> bool;
}

/// Runs real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_installed(&self, program: &str) -> bool {
        find_on_path(program, std::env::var_os("PATH")).is_some()
    }
}

/// Locate an executable `program` in a `PATH`-style search list.
#[must_use]
pub fn find_on_path(program: &str, path_var: Option<std::ffi::OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

#[cfg(windows)]
fn candidates(dir: &std::path::Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program), dir.join(format!("{program}.exe"))]
}

#[cfg(not(windows))]
fn candidates(dir: &std::path::Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}
