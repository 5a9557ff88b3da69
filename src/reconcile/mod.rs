//! Reconciliation engine: launch-path resolution, validation, asset
//! matching, classification, human resolution and reporting.

pub(crate) mod classify;
pub(crate) mod config_path;
pub(crate) mod matcher;
pub(crate) mod report;
pub(crate) mod session;
pub(crate) mod validate;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::AssetUniverses;
use crate::model::{CatalogEntry, CheckedEntry, EntryOrigin, MatchCandidate, ValidationResult};
use crate::shortcut::{ShortcutResolver, display_name};

use config_path::resolve_config_path;
use matcher::{AssetMatcher, SHORTLIST_LEN};
use validate::validate_entry;

/// Resolves a catalog entry's launch path from its config and validates it.
pub(crate) fn check_catalog_entry(
    entry: &CatalogEntry,
    config_dir: &Path,
    search_dirs: &[PathBuf],
) -> CheckedEntry {
    let resolved = match entry.config_ref.as_deref() {
        Some(config_ref) => match resolve_config_path(config_dir, config_ref) {
            Ok(path) => Some(path),
            Err(err) => {
                debug!(name = %entry.name, reason = err.kind(), error = %err, "no launch path");
                None
            }
        },
        None => None,
    };

    let validation = validate_entry(&entry.backend, resolved.as_deref(), search_dirs);
    debug!(
        name = %entry.name,
        backend = entry.backend.as_str(),
        validation = validation.as_str(),
        "checked catalog entry"
    );

    CheckedEntry {
        name: entry.name.clone(),
        command: resolved.unwrap_or_default(),
        validation,
        origin: EntryOrigin::Catalog {
            id: entry.id,
            config_ref: entry.config_ref.clone(),
        },
    }
}

/// Resolves a shortcut file; unreadable shortcuts become broken entries.
pub(crate) fn check_shortcut(resolver: &impl ShortcutResolver, path: &Path) -> CheckedEntry {
    let origin = EntryOrigin::Shortcut {
        path: path.to_path_buf(),
    };

    match resolver.resolve(path) {
        Ok(target) => CheckedEntry {
            name: target.display_name,
            command: target.raw_path,
            validation: if target.exists {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid
            },
            origin,
        },
        Err(err) => {
            debug!(path = %path.display(), reason = err.kind(), error = %err, "unresolved shortcut");
            CheckedEntry {
                name: display_name(path),
                command: String::new(),
                validation: ValidationResult::Indeterminate,
                origin,
            }
        }
    }
}

/// Scores an entry against both asset universes.
pub(crate) fn match_entry(
    matcher: &AssetMatcher,
    assets: &AssetUniverses,
    entry: CheckedEntry,
) -> MatchCandidate {
    let mut shortlist = matcher.rank(&entry.name, &assets.screenshots);
    shortlist.truncate(SHORTLIST_LEN);
    let screenshot = shortlist.first().cloned();
    let banner = matcher.best_match(&entry.name, &assets.banners);

    MatchCandidate {
        entry,
        screenshot,
        banner,
        shortlist,
    }
}

/// Presentation order: case-insensitive by display name.
pub(crate) fn sort_by_name(candidates: &mut [MatchCandidate]) {
    candidates.sort_by_key(|candidate| candidate.entry.name.to_lowercase());
}
