//! Produce a project directory from the template payload.
//!
//! Stages run in order and the first failure ends the call. Nothing is rolled
//! back: a tree copied before a failing setup script stays on disk so the
//! caller can inspect it.

pub mod copy;
pub mod runner;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::error::{KmpgenError, Result};
use crate::request::ValidatedRequest;

pub use copy::{copy_tree, dir_is_empty, strip_entries, CopyStats};
pub use runner::{ProcessOutput, ScriptRunner, SetupRunner};

/// Result of one materialization that reached the setup script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationOutcome {
    pub succeeded: bool,
    pub target_path: PathBuf,
    pub process_exit_code: Option<i32>,
    pub diagnostics: String,
}

/// Copy the template into `request.output_dir` and run the setup script there.
///
/// Returns `Err` when a stage before the script fails or the script cannot be
/// run at all. A script that runs and exits non-zero yields an outcome with
/// `succeeded == false`.
pub fn materialize(
    request: &ValidatedRequest,
    config: &GeneratorConfig,
    runner: &dyn SetupRunner,
) -> Result<MaterializationOutcome> {
    let target = request.output_dir.as_path();
    let template_root = config.template_root.as_path();

    if target.starts_with(template_root) {
        return Err(KmpgenError::TargetInsideTemplate {
            target: target.to_path_buf(),
            template: template_root.to_path_buf(),
        });
    }

    if target.exists() && !dir_is_empty(target)? {
        return Err(KmpgenError::OutputExists {
            path: target.to_path_buf(),
        });
    }

    std::fs::create_dir_all(target).map_err(|e| KmpgenError::Io {
        context: format!("creating output directory {}", target.display()),
        source: e,
    })?;

    let stats = copy_tree(template_root, target)?;
    tracing::info!(
        target = %target.display(),
        files = stats.files,
        dirs = stats.dirs,
        symlinks = stats.symlinks,
        "copied template"
    );

    let removed = strip_entries(target, &config.stripped_dirs)?;
    if !removed.is_empty() {
        tracing::debug!(?removed, "stripped generator-only entries");
    }

    if !target.join(runner.script()).exists() {
        return Err(KmpgenError::SetupScriptMissing {
            script: runner.script().to_string(),
        });
    }

    tracing::info!(script = runner.script(), "running parameterization step");
    let output = runner.run(target, &request.setup_answers(&config.confirmation))?;
    tracing::info!(exit_code = ?output.exit_code, "parameterization step finished");

    Ok(MaterializationOutcome {
        succeeded: output.success(),
        target_path: target.to_path_buf(),
        process_exit_code: output.exit_code,
        diagnostics: output.diagnostics(),
    })
}
