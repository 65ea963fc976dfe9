pub mod user;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KmpgenError, Result};

pub use user::user_config_path;

/// Settings for one generator instance. Resolved once at startup and handed to
/// [`crate::Generator::new`]; nothing reads configuration after that.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory holding the template payload.
    pub template_root: PathBuf,

    /// Parameterization script, relative to the copied project root.
    pub setup_script: String,

    /// Program that runs the setup script.
    pub interpreter: String,

    /// Final answer fed to the setup script after the three identifiers.
    pub confirmation: String,

    /// Directory names removed from the copy before parameterization.
    pub stripped_dirs: Vec<String>,

    /// Seconds to wait for the setup script; 0 waits forever.
    pub setup_timeout_secs: u64,

    /// Version catalog read by `deps`, relative to the template root.
    pub version_catalog: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_root: default_template_root(),
            setup_script: "setup.sh".to_string(),
            interpreter: "bash".to_string(),
            confirmation: "y".to_string(),
            stripped_dirs: vec![".git".to_string(), "mcp".to_string()],
            setup_timeout_secs: 600,
            version_catalog: PathBuf::from("gradle/libs.versions.toml"),
        }
    }
}

impl GeneratorConfig {
    pub fn setup_timeout(&self) -> Option<Duration> {
        (self.setup_timeout_secs > 0).then(|| Duration::from_secs(self.setup_timeout_secs))
    }

    /// Check that the template root is a directory and pin it to its canonical form.
    pub fn validate(mut self) -> Result<Self> {
        if !self.template_root.is_dir() {
            return Err(KmpgenError::TemplateRootMissing {
                path: self.template_root,
            });
        }
        self.template_root =
            std::fs::canonicalize(&self.template_root).map_err(|e| KmpgenError::Io {
                context: format!("resolving template root {}", self.template_root.display()),
                source: e,
            })?;
        Ok(self)
    }
}

/// The tool ships in a subdirectory of the template, so the template root is
/// the parent of the directory holding the executable.
fn default_template_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Overrides collected from the command line and environment.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub template_root: Option<PathBuf>,
}

/// Load a config file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KmpgenError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| KmpgenError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Layer defaults, the config file (explicit or per-user), and overrides.
pub fn resolve_config(overrides: ConfigOverrides) -> Result<GeneratorConfig> {
    let mut config = match overrides.config_file {
        Some(path) => load_config(&path)?,
        None => match user_config_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading user config");
                load_config(&path)?
            }
            None => GeneratorConfig::default(),
        },
    };

    if let Some(root) = overrides.template_root {
        config.template_root = root;
    }

    config.validate()
}
