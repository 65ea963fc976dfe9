use serde::{Deserialize, Serialize};

use crate::error::{KmpgenError, Result};
use crate::identifier::{
    resolve_bundle_id, validate_package_name, validate_project_name, BundleId, PackageName,
    ProjectName,
};
use crate::path_guard::{authorize, AuthorizedPath};

/// Raw input for one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub project_name: String,
    pub package_name: String,
    pub output_dir: String,
    /// Defaults to the package name.
    #[serde(default, alias = "iosBundleId")]
    pub bundle_id: Option<String>,
}

/// A request whose identifiers and output path all passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub project_name: ProjectName,
    pub package_name: PackageName,
    pub bundle_id: BundleId,
    pub output_dir: AuthorizedPath,
}

impl ValidatedRequest {
    /// Newline-terminated answers for the setup script, ending with `confirmation`.
    pub fn setup_answers(&self, confirmation: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}\n",
            self.project_name, self.package_name, self.bundle_id, confirmation
        )
    }
}

impl GenerationRequest {
    /// Run every identifier check, then the path check. Stops at the first failure.
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let project_name = validate_project_name(&self.project_name)?;
        let package_name = validate_package_name(&self.package_name)?;
        let bundle_id = resolve_bundle_id(self.bundle_id.as_deref(), &package_name)?;
        let output_dir =
            authorize(&self.output_dir, None).map_err(|source| KmpgenError::PathSecurity {
                role: "output directory",
                source,
            })?;

        Ok(ValidatedRequest {
            project_name,
            package_name,
            bundle_id,
            output_dir,
        })
    }
}
