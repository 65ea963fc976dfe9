//! Normalization and authorization of caller-supplied filesystem paths.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Locations that are never acceptable as a generation or validation target,
/// matched as whole path prefixes.
pub const DENIED_ROOTS: &[&str] = &["/etc", "/usr", "/bin", "/sbin", "/var", "/root"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path is required")]
    Empty,

    #[error("Path contains null bytes")]
    NullByte,

    #[error("Path {path} escapes the allowed directory {root}")]
    EscapesRoot { path: PathBuf, root: PathBuf },

    #[error("Cannot use system directory: {path}")]
    SystemDirectory { path: PathBuf },

    #[error("Cannot resolve path: {message}")]
    Unresolvable { message: String },
}

/// An absolute, symlink-resolved path with no `.` or `..` components that
/// passed every [`authorize`] check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPath(PathBuf);

impl AuthorizedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for AuthorizedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AuthorizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolve `path` and check it against `required_root` and [`DENIED_ROOTS`].
///
/// Checks run in order and the first failure wins: null bytes, containment
/// within the root (equal to it, or below it at a separator boundary, so
/// `/foo` never admits `/foobar`), then the system deny-list.
pub fn authorize(path: &str, required_root: Option<&str>) -> Result<AuthorizedPath, PathError> {
    authorize_in(path, required_root, None, DENIED_ROOTS)
}

/// [`authorize`] with relative paths anchored at `cwd` (the process working
/// directory when `None`) and an explicit deny-list.
fn authorize_in(
    path: &str,
    required_root: Option<&str>,
    cwd: Option<&Path>,
    denied_roots: &[&str],
) -> Result<AuthorizedPath, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.contains('\0') {
        return Err(PathError::NullByte);
    }

    let lexical = absolute_normalized(Path::new(path), cwd)?;
    let resolved = resolve_existing_prefix(&lexical)?;

    if let Some(root) = required_root {
        if root.contains('\0') {
            return Err(PathError::NullByte);
        }
        let root = resolve_existing_prefix(&absolute_normalized(Path::new(root), cwd)?)?;
        // Path::starts_with compares whole components
        if !resolved.starts_with(&root) {
            return Err(PathError::EscapesRoot {
                path: resolved,
                root,
            });
        }
    }

    if is_denied(&lexical, &resolved, denied_roots) {
        return Err(PathError::SystemDirectory { path: resolved });
    }

    Ok(AuthorizedPath(resolved))
}

/// A path is denied when either its written or its resolved form lies under a
/// denied root, taken both as written and with its own symlinks resolved
/// (`/etc` is `/private/etc` on macOS).
fn is_denied(lexical: &Path, resolved: &Path, denied_roots: &[&str]) -> bool {
    denied_roots.iter().any(|denied| {
        let denied = Path::new(denied);
        let canonical = std::fs::canonicalize(denied).ok();
        [lexical, resolved].iter().any(|candidate| {
            candidate.starts_with(denied)
                || canonical
                    .as_deref()
                    .is_some_and(|canonical| candidate.starts_with(canonical))
        })
    })
}

/// Make `path` absolute and fold away `.`/`..` without touching the disk.
fn absolute_normalized(path: &Path, cwd: Option<&Path>) -> Result<PathBuf, PathError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let base = match cwd {
            Some(cwd) => cwd.to_path_buf(),
            None => std::env::current_dir().map_err(|e| PathError::Unresolvable {
                message: format!("current directory unavailable: {e}"),
            })?,
        };
        base.join(path)
    };
    Ok(normalize_lexically(&absolute))
}

/// Resolve symlinks in the longest prefix of `normalized` that exists on disk.
/// Components past that prefix are kept as written, since the directory may
/// not have been created yet.
fn resolve_existing_prefix(normalized: &Path) -> Result<PathBuf, PathError> {
    for existing in normalized.ancestors() {
        if let Ok(canonical) = std::fs::canonicalize(existing) {
            let rest = normalized
                .strip_prefix(existing)
                .map_err(|e| PathError::Unresolvable {
                    message: e.to_string(),
                })?;
            return Ok(if rest.as_os_str().is_empty() {
                canonical
            } else {
                canonical.join(rest)
            });
        }
    }

    Ok(normalized.to_path_buf())
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
