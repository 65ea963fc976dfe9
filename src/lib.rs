pub mod config;
pub mod deps;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod materialize;
pub mod path_guard;
pub mod report;
pub mod request;
pub mod scan;

use crate::config::GeneratorConfig;
use crate::deps::DependencyCatalog;
use crate::error::{KmpgenError, Result};
use crate::materialize::{materialize, ScriptRunner, SetupRunner};
use crate::path_guard::authorize;
use crate::report::GenerateReport;
use crate::scan::ScanReport;

pub use crate::request::{GenerationRequest, ValidatedRequest};

/// Entry point for the `generate`, `validate`, and `deps` operations.
///
/// Holds the configuration resolved at startup and the runner used for the
/// template's setup script. Calls share no mutable state; two concurrent
/// `generate` calls against the same output directory are not guarded.
pub struct Generator<R: SetupRunner = ScriptRunner> {
    config: GeneratorConfig,
    runner: R,
}

impl Generator<ScriptRunner> {
    /// A generator that runs the configured setup script as a child process.
    pub fn from_config(config: GeneratorConfig) -> Self {
        let runner = ScriptRunner::from_config(&config);
        Self::new(config, runner)
    }
}

impl<R: SetupRunner> Generator<R> {
    pub fn new(config: GeneratorConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Validate the request, materialize the project, then scan it.
    ///
    /// Every validation runs before anything touches the filesystem. A failed
    /// setup script is an error; leftover template references are not.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerateReport> {
        let validated = request.validate()?;
        tracing::info!(
            project = %validated.project_name,
            package = %validated.package_name,
            bundle = %validated.bundle_id,
            target = %validated.output_dir,
            "generating project"
        );

        let outcome = materialize(&validated, &self.config, &self.runner)?;
        if !outcome.succeeded {
            return Err(KmpgenError::SetupFailed {
                script: self.runner.script().to_string(),
                target: outcome.target_path,
                exit_code: outcome.process_exit_code,
                diagnostics: outcome.diagnostics,
            });
        }

        let scan = scan::scan(&outcome.target_path);
        match &scan {
            Ok(report) if !report.is_clean => tracing::warn!(
                references = report.references.len(),
                "generated project still contains template references"
            ),
            Err(e) => tracing::warn!(error = %e, "post-generation scan failed"),
            Ok(_) => {}
        }

        Ok(GenerateReport::new(&validated, outcome, scan))
    }

    /// Scan an existing project for leftover template references.
    pub fn validate(&self, project_dir: &str) -> Result<ScanReport> {
        validate_project(project_dir)
    }

    /// Versions declared in the template's version catalog.
    pub fn list_dependencies(&self) -> Result<DependencyCatalog> {
        deps::list_dependencies(&self.config.template_root, &self.config.version_catalog)
    }
}

/// Authorize `project_dir`, require it to exist, and scan it. Needs no template.
pub fn validate_project(project_dir: &str) -> Result<ScanReport> {
    let dir = authorize(project_dir, None).map_err(|source| KmpgenError::PathSecurity {
        role: "project directory",
        source,
    })?;
    if !dir.as_path().exists() {
        return Err(KmpgenError::ProjectDirMissing {
            path: dir.into_path_buf(),
        });
    }
    tracing::info!(dir = %dir, "validating project");
    scan::scan(dir.as_path())
}
