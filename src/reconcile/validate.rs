use std::path::{Path, PathBuf};

use crate::model::{Backend, ValidationResult};

/// Checks a resolved launch path against the backend's validation policy.
pub(crate) fn validate_entry(
    backend: &Backend,
    path: Option<&str>,
    search_dirs: &[PathBuf],
) -> ValidationResult {
    let Some(path) = path else {
        return ValidationResult::Indeterminate;
    };

    let valid = match backend {
        Backend::FilesystemPath => Path::new(path).exists(),
        Backend::SearchPath => find_executable(path, search_dirs).is_some(),
        Backend::Other(_) => true,
    };

    if valid {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid
    }
}

/// Looks up the basename of `path` in `search_dirs`, first hit wins.
pub(crate) fn find_executable(path: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let name = Path::new(path).file_name()?;

    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

pub(crate) fn default_search_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default()
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| matches!(ext.as_str(), "exe" | "bat" | "cmd" | "com"))
    }
}
