//! Writing generated files below an output directory.

use crate::codegen::GeneratedFile;
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Joins a generated file name onto `out_dir`.
///
/// Only plain relative names are accepted; absolute paths and `..`
/// components fail with [`Error::PathTraversal`].
pub fn output_path(out_dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if name.is_empty() || escapes {
        return Err(Error::path_traversal(relative));
    }
    Ok(out_dir.join(relative))
}

/// Writes every file below `out_dir`, creating directories as needed.
///
/// Existing files are only replaced when `overwrite` is set. Returns the
/// written paths in input order.
pub fn write_files(files: &[GeneratedFile], out_dir: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let path = output_path(out_dir, &file.name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut handle = options.open(&path).map_err(|e| Error::file_write(&path, e))?;
        handle
            .write_all(file.content.as_bytes())
            .map_err(|e| Error::file_write(&path, e))?;

        debug!(path = %path.display(), bytes = file.content.len(), "wrote file");
        written.push(path);
    }

    Ok(written)
}
