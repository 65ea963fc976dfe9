//! Read the template's dependency versions from its version catalog.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{KmpgenError, Result};

/// Catalog keys highlighted ahead of the full list.
pub const CORE_COMPONENTS: &[&str] = &["kotlin", "agp", "compose"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCatalog {
    /// Entries from [`CORE_COMPONENTS`] that the catalog defines, in that order.
    pub core: Vec<Dependency>,
    /// Every plain `name = "version"` entry, sorted by name.
    pub all: Vec<Dependency>,
}

pub fn list_dependencies(template_root: &Path, catalog: &Path) -> Result<DependencyCatalog> {
    let path = template_root.join(catalog);
    if !path.is_file() {
        return Err(KmpgenError::CatalogNotFound { path });
    }
    let content = std::fs::read_to_string(&path).map_err(|e| KmpgenError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    parse_versions(&content, &path)
}

/// Extract the `[versions]` table. Non-string values (rich version
/// declarations) are skipped.
pub fn parse_versions(content: &str, path: &Path) -> Result<DependencyCatalog> {
    let table: toml::Table = toml::from_str(content).map_err(|e| KmpgenError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let versions: BTreeMap<&str, &str> = table
        .get("versions")
        .and_then(toml::Value::as_table)
        .map(|t| {
            t.iter()
                .filter_map(|(k, v)| Some((k.as_str(), v.as_str()?)))
                .collect()
        })
        .unwrap_or_default();

    let entry = |name: &str, version: &str| Dependency {
        name: name.to_string(),
        version: version.to_string(),
    };

    Ok(DependencyCatalog {
        core: CORE_COMPONENTS
            .iter()
            .filter_map(|&key| versions.get(key).map(|&v| entry(key, v)))
            .collect(),
        all: versions.iter().map(|(&k, &v)| entry(k, v)).collect(),
    })
}
