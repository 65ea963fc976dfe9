//! Post-generation scan for leftover template markers.
//!
//! The scan is read-only and deterministic: entries are visited in file-name
//! order, so scanning an unchanged tree twice yields identical reports.

pub mod patterns;

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex_lite::Regex;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::error::{KmpgenError, Result};
use patterns::{marker_regex_source, BENIGN_MARKERS, EXCLUDED_DIRS, SCANNED_EXTENSIONS};

/// Placeholder line text for a match inside a binary file.
pub const BINARY_MATCH: &str = "Binary file matches";

/// A single line still carrying a template marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReference {
    pub file_path: PathBuf,
    /// 1-based; `None` for matches inside binary files.
    pub line_number: Option<usize>,
    pub line_text: String,
}

impl fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(n) => write!(f, "{}:{}: {}", self.file_path.display(), n, self.line_text),
            None => write!(f, "{}: {}", self.file_path.display(), self.line_text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub is_clean: bool,
    pub references: Vec<TemplateReference>,
}

impl ScanReport {
    pub fn new(references: Vec<TemplateReference>) -> Self {
        Self {
            is_clean: references.is_empty(),
            references,
        }
    }
}

pub struct ContentScanner {
    include: GlobSet,
    marker: Regex,
    benign: Vec<String>,
    excluded_dirs: Vec<String>,
}

impl ContentScanner {
    /// Scanner built from the tables in [`patterns`].
    pub fn new() -> Result<Self> {
        let extension_globs: Vec<String> =
            SCANNED_EXTENSIONS.iter().map(|ext| format!("*.{ext}")).collect();
        Ok(Self {
            include: build_glob_set(&extension_globs)?,
            marker: build_marker_regex(&marker_regex_source())?,
            benign: BENIGN_MARKERS.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn scan(&self, root: &Path) -> Result<ScanReport> {
        let mut references = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(e));

        for entry in walker {
            let entry = entry.map_err(|e| KmpgenError::Walk {
                root: root.to_path_buf(),
                source: e,
            })?;
            if !entry.file_type().is_file() || !self.include.is_match(entry.file_name()) {
                continue;
            }
            self.scan_file(entry.path(), &mut references)?;
        }

        tracing::debug!(
            root = %root.display(),
            references = references.len(),
            "content scan finished"
        );
        Ok(ScanReport::new(references))
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .excluded_dirs
                .iter()
                .any(|name| entry.file_name() == name.as_str())
    }

    fn is_marked(&self, line: &str) -> bool {
        self.marker.is_match(line) && !self.benign.iter().any(|b| line.contains(b.as_str()))
    }

    fn scan_file(&self, path: &Path, references: &mut Vec<TemplateReference>) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| KmpgenError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        if is_binary(&bytes) {
            if text.lines().any(|line| self.is_marked(line)) {
                references.push(TemplateReference {
                    file_path: path.to_path_buf(),
                    line_number: None,
                    line_text: BINARY_MATCH.to_string(),
                });
            }
            return Ok(());
        }

        for (idx, line) in text.lines().enumerate() {
            if self.is_marked(line) {
                references.push(TemplateReference {
                    file_path: path.to_path_buf(),
                    line_number: Some(idx + 1),
                    line_text: line.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Scan `root` with the default tables.
pub fn scan(root: &Path) -> Result<ScanReport> {
    ContentScanner::new()?.scan(root)
}

/// Binary detection on the first 8KB (BOM-aware, null-byte scanning).
fn is_binary(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(8192)];
    !content_inspector::inspect(head).is_text()
}

fn build_marker_regex(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| KmpgenError::RegexPattern {
        pattern: source.to_string(),
        source: e,
    })
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| KmpgenError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| KmpgenError::GlobPattern {
        pattern: "<combined>".into(),
        source: e,
    })
}
