//! Per-item failure reasons.
//!
//! These never abort a run on their own: an entry that yields one of them is
//! classified as broken and the batch moves on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("resource not found: {}", path.display())]
    ResourceMissing { path: PathBuf },

    #[error("malformed source {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("no `{field}` field in {}", path.display())]
    FieldMissing { path: PathBuf, field: &'static str },
}

impl SourceError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedSource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceMissing { .. } => "resource_missing",
            Self::MalformedSource { .. } => "malformed_source",
            Self::FieldMissing { .. } => "field_missing",
        }
    }
}
