use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine the home directory")
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

/// Lists the file names in `dir`, sorted. A missing directory yields `None`.
pub fn list_file_names(dir: &Path) -> Result<Option<Vec<String>>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut names = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_owned());
        }
    }

    names.sort();
    Ok(Some(names))
}

/// Removes `path` if it exists. Returns whether a file was removed.
pub fn remove_if_present(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_file_names_sorts_and_reports_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.png"), b"").expect("write");
        fs::write(dir.path().join("a.jpg"), b"").expect("write");

        let names = list_file_names(dir.path()).expect("list").expect("present");
        assert_eq!(names, vec!["a.jpg".to_string(), "b.png".to_string()]);

        let missing = list_file_names(&dir.path().join("nope")).expect("list");
        assert!(missing.is_none());
    }

    #[test]
    fn remove_if_present_ignores_absent_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("art.png");
        assert!(!remove_if_present(&path).expect("remove"));

        fs::write(&path, b"x").expect("write");
        assert!(remove_if_present(&path).expect("remove"));
        assert!(!path.exists());
    }
}
