use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{errors::PipelineError, types::ObjectName};

/// Whether a script file name belongs to the object: the name must start
/// with `schema.name.`, compared case-insensitively.
pub fn file_matches_object(file_name: &str, object: &ObjectName) -> bool {
    file_name
        .to_lowercase()
        .starts_with(&format!("{}.", object.key()))
}

/// Every regular file below `root`, in path order. Hidden entries such as
/// `.git` are skipped.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| PipelineError::file_system(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| PipelineError::file_system(&dir, e))?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| PipelineError::file_system(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Modification time of every file below `root`, and of `root` itself when
/// it is a file.
pub fn modification_times(root: &Path) -> Result<HashMap<PathBuf, SystemTime>, PipelineError> {
    let files = if root.is_file() {
        vec![root.to_path_buf()]
    } else if root.is_dir() {
        list_files(root)?
    } else {
        Vec::new()
    };

    files
        .into_iter()
        .map(|path| modified(&path).map(|time| (path, time)))
        .collect()
}

/// Files below `root` (or `root` itself) that are absent from `before` or
/// whose modification time moved.
pub fn written_since(
    root: &Path,
    before: &HashMap<PathBuf, SystemTime>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut written: Vec<PathBuf> = modification_times(root)?
        .into_iter()
        .filter(|(path, time)| before.get(path) != Some(time))
        .map(|(path, _)| path)
        .collect();
    written.sort();
    Ok(written)
}

fn modified(path: &Path) -> Result<SystemTime, PipelineError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| PipelineError::file_system(path, e))
}

pub fn ensure_dir(path: &Path) -> Result<(), PipelineError> {
    std::fs::create_dir_all(path).map_err(|e| PipelineError::file_system(path, e))
}
