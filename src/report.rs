//! Structured payloads returned to callers.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ErrorKind, KmpgenError};
use crate::materialize::MaterializationOutcome;
use crate::request::ValidatedRequest;
use crate::scan::ScanReport;

/// Outcome of a successful `generate`. Leftover template references in
/// `scan_report` are warnings; the project was still produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    pub success: bool,
    pub target_path: PathBuf,
    pub project_name: String,
    pub package_name: String,
    pub bundle_id: String,
    pub process_exit_code: Option<i32>,
    pub materialization_diagnostics: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_report: Option<ScanReport>,
    /// Set when the post-generation scan itself could not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
    pub next_steps: Vec<String>,
}

impl GenerateReport {
    pub fn new(
        request: &ValidatedRequest,
        outcome: MaterializationOutcome,
        scan: Result<ScanReport, KmpgenError>,
    ) -> Self {
        let (scan_report, scan_error) = match scan {
            Ok(report) => (Some(report), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            success: outcome.succeeded,
            next_steps: next_steps(&outcome.target_path),
            target_path: outcome.target_path,
            project_name: request.project_name.to_string(),
            package_name: request.package_name.to_string(),
            bundle_id: request.bundle_id.to_string(),
            process_exit_code: outcome.process_exit_code,
            materialization_diagnostics: outcome.diagnostics,
            scan_report,
            scan_error,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.scan_report.as_ref().is_some_and(|r| r.is_clean)
    }
}

/// What to do with a freshly generated project.
pub fn next_steps(target: &Path) -> Vec<String> {
    vec![
        format!("cd {}", target.display()),
        "Create local.properties with: sdk.dir=/path/to/android/sdk".to_string(),
        "./gradlew :androidApp:assembleDebug".to_string(),
        "Open iosApp/iosApp.xcodeproj in Xcode for iOS".to_string(),
    ]
}

/// Failure payload for structured output. A failed setup script still leaves
/// the copied project on disk, so its location and the process result come
/// along.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub success: bool,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materialization_diagnostics: Option<String>,
}

impl From<&KmpgenError> for ErrorPayload {
    fn from(err: &KmpgenError) -> Self {
        let (target_path, process_exit_code, materialization_diagnostics) = match err {
            KmpgenError::SetupFailed {
                target,
                exit_code,
                diagnostics,
                ..
            } => (Some(target.clone()), *exit_code, Some(diagnostics.clone())),
            _ => (None, None, None),
        };
        Self {
            success: false,
            kind: err.kind(),
            message: err.to_string(),
            target_path,
            process_exit_code,
            materialization_diagnostics,
        }
    }
}
