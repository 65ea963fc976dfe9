use std::path::Path;

use walkdir::WalkDir;

use crate::error::{KmpgenError, Result};

/// Counts of what [`copy_tree`] wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub symlinks: usize,
}

/// Recursively copy everything under `src` into `dest`, preserving structure.
///
/// Symlinks are recreated rather than followed on unix.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| KmpgenError::Walk {
            root: src.to_path_buf(),
            source: e,
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .expect("entry must be under template root");
        let dest_path = dest.join(rel_path);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&dest_path).map_err(|e| KmpgenError::Io {
                context: format!("creating directory {}", dest_path.display()),
                source: e,
            })?;
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest_path)?;
            stats.symlinks += 1;
        } else {
            std::fs::copy(entry.path(), &dest_path).map_err(|e| KmpgenError::Io {
                context: format!(
                    "copying {} to {}",
                    entry.path().display(),
                    dest_path.display()
                ),
                source: e,
            })?;
            stats.files += 1;
        }
    }

    Ok(stats)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    let target = std::fs::read_link(src).map_err(|e| KmpgenError::Io {
        context: format!("reading link {}", src.display()),
        source: e,
    })?;
    std::os::unix::fs::symlink(&target, dest).map_err(|e| KmpgenError::Io {
        context: format!("creating link {}", dest.display()),
        source: e,
    })
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    std::fs::copy(src, dest)
        .map(|_| ())
        .map_err(|e| KmpgenError::Io {
            context: format!("copying {} to {}", src.display(), dest.display()),
            source: e,
        })
}

/// Remove each named entry directly under `root` if present. Returns the names removed.
pub fn strip_entries(root: &Path, names: &[String]) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for name in names {
        let path = root.join(name);
        let Ok(meta) = std::fs::symlink_metadata(&path) else {
            continue;
        };
        let result = if meta.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        result.map_err(|e| KmpgenError::Io {
            context: format!("removing {}", path.display()),
            source: e,
        })?;
        removed.push(name.clone());
    }
    Ok(removed)
}

pub fn dir_is_empty(path: &Path) -> Result<bool> {
    let mut entries = std::fs::read_dir(path).map_err(|e| KmpgenError::Io {
        context: format!("reading target directory {}", path.display()),
        source: e,
    })?;
    Ok(entries.next().is_none())
}
