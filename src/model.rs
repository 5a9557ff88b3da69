use std::path::PathBuf;

use serde::Serialize;

/// How an entry's launch target is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Target is a literal path that must exist on disk.
    FilesystemPath,
    /// Target is an executable looked up by basename on the search path.
    SearchPath,
    /// Runner without a validation policy; any resolved path is accepted.
    Other(Option<String>),
}

impl Backend {
    pub fn from_runner(runner: Option<&str>) -> Self {
        match runner {
            Some("wine") => Self::FilesystemPath,
            Some("linux") => Self::SearchPath,
            other => Self::Other(other.map(ToOwned::to_owned)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FilesystemPath => "filesystem",
            Self::SearchPath => "search-path",
            Self::Other(Some(runner)) => runner,
            Self::Other(None) => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub backend: Backend,
    pub config_ref: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid,
    /// No launch path could be derived at all.
    Indeterminate,
}

impl ValidationResult {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Indeterminate => "no-path",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    Catalog {
        id: i64,
        config_ref: Option<String>,
    },
    Shortcut {
        path: PathBuf,
    },
}

/// An entry after path resolution and validation, ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedEntry {
    pub name: String,
    /// Raw launch command or path; empty when nothing resolved.
    pub command: String,
    pub validation: ValidationResult,
    pub origin: EntryOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAsset {
    pub name: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub entry: CheckedEntry,
    /// Best match in the screenshot universe; drives classification.
    pub screenshot: Option<ScoredAsset>,
    pub banner: Option<ScoredAsset>,
    pub shortlist: Vec<ScoredAsset>,
}

impl MatchCandidate {
    pub fn score(&self) -> u8 {
        self.screenshot.as_ref().map_or(0, |asset| asset.score)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bucket {
    Healthy,
    Broken,
    Matched,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Fixed(ScoredAsset),
    Bad,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: String,
    pub entry_count: usize,
    pub broken: usize,
    pub matched: usize,
    pub ambiguous: usize,
    pub fixed: usize,
    pub bad: usize,
    pub session_cancelled: bool,
    pub metadata_path: Option<String>,
    pub log_path: Option<String>,
}
