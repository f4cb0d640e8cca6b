//! Security scanning of hosted projects with Trivy.
//!
//! DESIGN
//! ======
//! `trivy fs --format json <path>` is run against the checkout and its report
//! reduced to a vulnerability count, the highest severity seen and a canned
//! recommendation. The raw report is kept alongside the summary.
//!
//! ERROR HANDLING
//! ==============
//! A failed scan still yields a `ScanResult` carrying the error text and any
//! captured output, so callers can always show or persist what happened. An
//! unparseable report is recorded on the result but is not a scan failure.

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::services::command::CommandRunner;

#[cfg(test)]
#[path = "scanning_test.rs"]
mod tests;

pub const TRIVY: &str = "trivy";

const NOT_INSTALLED_MESSAGE: &str = "Trivy is not installed. Cannot perform security scan.";
const NO_VULNERABILITIES: &str = "No vulnerabilities found.";

const INSTALL_INSTRUCTIONS: &str = "Trivy is not installed. Please install it using:

    # For Arch Linux/Manjaro
    sudo pacman -S trivy

    # For Ubuntu/Debian
    sudo apt-get install trivy

    # For macOS
    brew install trivy

    For more information, visit: https://aquasecurity.github.io/trivy/latest/getting-started/installation/";

/// Outcome of one scan, as returned by the API and stored in `scans`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub project_id: i64,
    /// RFC 3339 timestamp.
    pub scan_date: String,
    pub vuln_count: i64,
    pub raw_output: String,
    /// Highest severity seen, e.g. `HIGH`. Empty when nothing was found.
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    fn started(project_id: i64) -> Self {
        Self {
            project_id,
            scan_date: now_rfc3339(),
            vuln_count: 0,
            raw_output: String::new(),
            severity: String::new(),
            recommended: None,
            error: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("trivy is not installed")]
    NotInstalled,
    #[error("failed to run trivy: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("trivy exited with status {}", .code.map_or_else(|| "unknown".to_owned(), |c| c.to_string()))]
    Exit { code: Option<i32> },
}

/// A scan that did not complete, with the partial result describing why.
#[derive(Debug, thiserror::Error)]
#[error("scan of project {} failed: {error}", .result.project_id)]
pub struct ScanFailure {
    pub result: ScanResult,
    pub error: ScanError,
}

/// Reduced view of a Trivy JSON report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub vuln_count: i64,
    pub severity: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrivyReport {
    #[serde(default)]
    results: Option<Vec<TrivyTarget>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrivyTarget {
    #[serde(default)]
    vulnerabilities: Option<Vec<TrivyVulnerability>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrivyVulnerability {
    #[serde(default)]
    severity: Option<String>,
}

/// Whether `trivy` can be found by `runner`.
#[must_use]
pub fn is_trivy_installed(runner: &dyn CommandRunner) -> bool {
    runner.is_installed(TRIVY)
}

/// Installation help shown when Trivy is missing.
#[must_use]
pub fn install_instructions() -> &'static str {
    INSTALL_INSTRUCTIONS
}

/// Scan the checkout at `path` for `project_id`.
///
/// # Errors
///
/// Returns a `ScanFailure` when Trivy is missing, cannot be started, or
/// exits non-zero. The failure's `result` carries the error text.
pub async fn scan_project(runner: &dyn CommandRunner, project_id: i64, path: &Path) -> Result<ScanResult, ScanFailure> {
    let mut result = ScanResult::started(project_id);

    if !is_trivy_installed(runner) {
        warn!(project_id, "scan failed: {NOT_INSTALLED_MESSAGE}");
        result.error = Some(NOT_INSTALLED_MESSAGE.to_owned());
        result.recommended = Some(INSTALL_INSTRUCTIONS.to_owned());
        return Err(ScanFailure { result, error: ScanError::NotInstalled });
    }

    let args = vec!["fs".to_owned(), "--format".to_owned(), "json".to_owned(), path.display().to_string()];
    let output = match runner.run(TRIVY, &args).await {
        Ok(output) => output,
        Err(e) => {
            warn!(project_id, error = %e, "trivy could not be started");
            result.error = Some(format!("Scan error: {e}"));
            return Err(ScanFailure { result, error: ScanError::Spawn(e) });
        }
    };

    result.raw_output = output.combined();
    if !output.success {
        let error = ScanError::Exit { code: output.code };
        warn!(project_id, %error, "trivy scan error");
        result.error = Some(format!("Scan error: {error}"));
        return Err(ScanFailure { result, error });
    }

    match summarize_report(&output.stdout) {
        Ok(summary) => {
            result.recommended = Some(if summary.vuln_count > 0 {
                recommendation(&summary.severity).to_owned()
            } else {
                NO_VULNERABILITIES.to_owned()
            });
            result.vuln_count = summary.vuln_count;
            result.severity = summary.severity;
        }
        Err(e) => {
            warn!(project_id, error = %e, "failed to parse trivy output");
            result.error = Some(format!("Failed to parse scan results: {e}"));
        }
    }

    info!(
        project_id,
        vuln_count = result.vuln_count,
        severity = %result.severity,
        "scan completed"
    );
    Ok(result)
}

/// Count vulnerabilities and find the highest severity in a Trivy report.
///
/// # Errors
///
/// Returns the JSON error when `raw` is not a Trivy report object.
pub fn summarize_report(raw: &str) -> Result<ReportSummary, serde_json::Error> {
    let report: TrivyReport = serde_json::from_str(raw)?;

    let mut vuln_count = 0_i64;
    let mut severity = String::new();
    let vulnerabilities = report
        .results
        .unwrap_or_default()
        .into_iter()
        .flat_map(|target| target.vulnerabilities.unwrap_or_default());

    for vuln in vulnerabilities {
        vuln_count += 1;
        if let Some(sev) = vuln.severity {
            if is_severity_higher(&sev, &severity) {
                severity = sev;
            }
        }
    }

    Ok(ReportSummary { vuln_count, severity })
}

/// Rank used to order Trivy severities. Unrecognized labels rank as `UNKNOWN`.
#[must_use]
pub fn severity_rank(severity: &str) -> i32 {
    match severity {
        "CRITICAL" => 4,
        "HIGH" => 3,
        "MEDIUM" => 2,
        "LOW" => 1,
        "" => -1,
        _ => 0,
    }
}

#[must_use]
pub fn is_severity_higher(a: &str, b: &str) -> bool {
    severity_rank(a) > severity_rank(b)
}

/// Canned advice for the highest severity found.
#[must_use]
pub fn recommendation(severity: &str) -> &'static str {
    match severity {
        "CRITICAL" => "Immediate action required. Update vulnerable dependencies as soon as possible.",
        "HIGH" => "High priority fix needed. Update affected components soon.",
        "MEDIUM" => "Update affected components during next maintenance cycle.",
        "LOW" => "Low risk. Consider updating during regular maintenance.",
        _ => "Unknown severity. Review scan details for more information.",
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}
