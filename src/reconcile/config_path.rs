use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

pub(crate) const EXE_MARKER: &str = "exe:";

pub(crate) fn config_file_path(config_dir: &Path, config_ref: &str) -> PathBuf {
    config_dir.join(format!("{config_ref}.yml"))
}

/// Reads `<config_dir>/<config_ref>.yml` and extracts its launch path.
pub(crate) fn resolve_config_path(config_dir: &Path, config_ref: &str) -> Result<String, SourceError> {
    let path = config_file_path(config_dir, config_ref);

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(SourceError::ResourceMissing { path });
        }
        Err(err) => return Err(SourceError::malformed(path, err)),
    };

    parse_exe_value(&text).ok_or(SourceError::FieldMissing {
        path,
        field: "exe",
    })
}

/// Finds the first `exe:` line and folds in every following line that is
/// indented deeper than it. The first line at the same or a shallower depth
/// ends the value.
pub(crate) fn parse_exe_value(text: &str) -> Option<String> {
    let mut lines = text.lines();

    let (depth, mut value) = lines.by_ref().find_map(|line| {
        let trimmed = line.trim();
        trimmed
            .strip_prefix(EXE_MARKER)
            .map(|rest| (indent_width(line), rest.trim().to_string()))
    })?;

    for line in lines {
        if indent_width(line) <= depth {
            break;
        }

        let continuation = line.trim();
        if continuation.is_empty() {
            continue;
        }
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(continuation);
    }

    Some(value)
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|ch| ch.is_whitespace()).count()
}
