#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::identifier::IdentifierError;
use crate::path_guard::PathError;

/// Coarse classification of a failure, reported to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InputFormat,
    ReservedName,
    PathSecurity,
    PreexistingTarget,
    ExternalProcess,
    Filesystem,
    Configuration,
}

#[derive(Debug, Error, Diagnostic)]
pub enum KmpgenError {
    #[error(transparent)]
    #[diagnostic(help("Use a value like the example shown in the message"))]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid {role}: {source}")]
    #[diagnostic(help("Choose a location outside system directories"))]
    PathSecurity {
        role: &'static str,
        #[source]
        source: PathError,
    },

    #[error("Target directory {path} already exists and is not empty")]
    #[diagnostic(help("Pick a new output directory or empty this one first"))]
    OutputExists { path: PathBuf },

    #[error("Target directory {target} lies inside the template at {template}")]
    #[diagnostic(help("Generate the project outside the template tree"))]
    TargetInsideTemplate { target: PathBuf, template: PathBuf },

    #[error("Project directory does not exist: {path}")]
    ProjectDirMissing { path: PathBuf },

    #[error("{script} not found in template directory")]
    #[diagnostic(help("The template root must contain the setup script"))]
    SetupScriptMissing { script: String },

    #[error("Failed to start {script}: {source}")]
    SetupSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error running {script} (exit code {}): {diagnostics}", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    #[diagnostic(help("The copied project is left in place for inspection"))]
    SetupFailed {
        script: String,
        target: PathBuf,
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("{script} did not finish within {seconds}s and was killed")]
    #[diagnostic(help("Raise setup_timeout_secs in the config file, or set it to 0 to disable"))]
    SetupTimedOut { script: String, seconds: u64 },

    #[error("Template root not found: {path}")]
    #[diagnostic(help("Pass --template-root or set KMPGEN_TEMPLATE_ROOT"))]
    TemplateRootMissing { path: PathBuf },

    #[error("Version catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    #[error("Failed to parse {path}")]
    #[diagnostic(help("Check the TOML syntax"))]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed under {root}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Regex pattern error: {pattern}")]
    RegexPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl KmpgenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier(e) => e.kind(),
            Self::PathSecurity { .. } | Self::TargetInsideTemplate { .. } => ErrorKind::PathSecurity,
            Self::OutputExists { .. } => ErrorKind::PreexistingTarget,
            Self::SetupScriptMissing { .. }
            | Self::SetupSpawn { .. }
            | Self::SetupFailed { .. }
            | Self::SetupTimedOut { .. } => ErrorKind::ExternalProcess,
            Self::ProjectDirMissing { .. } | Self::Io { .. } | Self::Walk { .. } => {
                ErrorKind::Filesystem
            }
            Self::TemplateRootMissing { .. }
            | Self::CatalogNotFound { .. }
            | Self::TomlParse { .. }
            | Self::RegexPattern { .. }
            | Self::GlobPattern { .. } => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, KmpgenError>;
