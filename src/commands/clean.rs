use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::catalog::{Catalog, SqliteCatalog};
use crate::cli::CleanArgs;
use crate::commands::report_unavailable;
use crate::context::CatalogPaths;
use crate::model::{CheckedEntry, EntryOrigin};
use crate::prompt::{Prompt, TerminalPrompt};
use crate::reconcile::check_catalog_entry;
use crate::reconcile::classify::partition_structural;
use crate::reconcile::config_path::config_file_path;
use crate::util::{home_dir, remove_if_present};

const ART_EXTENSIONS: [&str; 2] = ["jpg", "png"];

pub fn run(args: CleanArgs) -> Result<()> {
    let home = home_dir()?;
    let paths = CatalogPaths::from_args(&args.catalog, &home);

    let mut prompt = TerminalPrompt::stdio();
    let mut out = io::stdout();
    clean_catalog(&paths, args.dry_run, &mut prompt, &mut out)
}

pub(crate) fn clean_catalog(
    paths: &CatalogPaths,
    dry_run: bool,
    prompt: &mut impl Prompt,
    out: &mut impl Write,
) -> Result<()> {
    let catalog_path = paths.catalog_path();
    let mut catalog = match SqliteCatalog::open(&catalog_path) {
        Ok(catalog) => catalog,
        Err(err) => {
            report_unavailable(out, "catalog", &err)?;
            writeln!(out, "bye")?;
            return Ok(());
        }
    };
    info!(path = %catalog_path.display(), "opened catalog");

    let broken = find_broken(&catalog, paths)?;

    if broken.is_empty() {
        writeln!(out, "everything looks clean to me")?;
    } else {
        writeln!(out, "The following games are missing binaries")?;
        for entry in &broken {
            writeln!(out, "  {}", entry.name)?;
        }

        if dry_run {
            info!(broken = broken.len(), "dry-run: nothing removed");
        } else if prompt.confirm("Would you like to remove these items?", false)? {
            let removed = remove_broken(&mut catalog, paths, &broken);
            catalog.commit()?;
            writeln!(out, "{removed} items removed")?;
        } else {
            writeln!(out, "nothing removed")?;
        }
    }

    writeln!(out, "bye")?;
    Ok(())
}

pub(crate) fn find_broken(catalog: &impl Catalog, paths: &CatalogPaths) -> Result<Vec<CheckedEntry>> {
    let checked = catalog
        .list_entries()?
        .iter()
        .map(|entry| check_catalog_entry(entry, &paths.config_dir, &paths.search_dirs))
        .collect::<Vec<_>>();
    let total = checked.len();

    let partition = partition_structural(checked);
    info!(
        total,
        healthy = partition.healthy.len(),
        broken = partition.broken.len(),
        "scanned catalog"
    );
    Ok(partition.broken)
}

/// Deletes the row, artwork and config of every broken entry. Each step is
/// attempted independently; a failure is logged and the batch continues.
/// Returns the number of catalog rows removed.
pub(crate) fn remove_broken(
    catalog: &mut impl Catalog,
    paths: &CatalogPaths,
    broken: &[CheckedEntry],
) -> usize {
    let mut removed = 0;

    for entry in broken {
        let EntryOrigin::Catalog { id, config_ref } = &entry.origin else {
            continue;
        };

        match catalog.delete_entry(*id) {
            Ok(()) => removed += 1,
            Err(err) => warn!(name = %entry.name, error = %err, "failed to delete catalog row"),
        }

        remove_art(paths, &entry.name);

        if let Some(config_ref) = config_ref {
            let config = config_file_path(&paths.config_dir, config_ref);
            match remove_if_present(&config) {
                Ok(true) => info!(path = %config.display(), "removed config"),
                Ok(false) => {}
                Err(err) => warn!(error = %err, "failed to remove config"),
            }
        }
    }

    removed
}

fn remove_art(paths: &CatalogPaths, name: &str) {
    for dir in [paths.banner_dir(), paths.coverart_dir()] {
        for ext in ART_EXTENSIONS {
            let art = dir.join(format!("{name}.{ext}"));
            if let Err(err) = remove_if_present(&art) {
                warn!(error = %err, "failed to remove artwork");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::Library;
    use crate::prompt::scripted::{Answer, ScriptedPrompt};

    fn remaining_names(library: &Library) -> Vec<String> {
        let catalog = SqliteCatalog::open(&library.catalog_paths().catalog_path()).expect("open");
        catalog
            .list_entries()
            .expect("list")
            .into_iter()
            .map(|entry| entry.name)
            .collect()
    }

    #[test]
    fn confirmed_clean_removes_rows_art_and_configs() {
        let library = Library::standard();
        let mut prompt = ScriptedPrompt::new([Answer::Confirm(true)]);
        let mut out = Vec::<u8>::new();

        clean_catalog(&library.catalog_paths(), false, &mut prompt, &mut out).expect("clean");

        let shown = String::from_utf8(out).expect("utf8");
        assert!(shown.contains("  Quake\n  Tux\n"));
        assert!(shown.contains("2 items removed"));
        assert!(shown.ends_with("bye\n"));

        assert_eq!(remaining_names(&library), vec!["Half-Life 2 Episode One", "Thief Gold"]);
        assert!(!library.path("configs/quake-2.yml").exists());
        assert!(!library.path("configs/tux-4.yml").exists());
        assert!(library.path("configs/thief-3.yml").exists());
        assert!(!library.path("data/banners/Quake.jpg").exists());
        assert!(!library.path("data/coverart/Quake.png").exists());
        assert!(library.path("data/coverart/Thief Gold.jpg").exists());
    }

    #[test]
    fn declined_clean_changes_nothing() {
        let library = Library::standard();
        let mut prompt = ScriptedPrompt::new([Answer::Confirm(false)]);
        let mut out = Vec::<u8>::new();

        clean_catalog(&library.catalog_paths(), false, &mut prompt, &mut out).expect("clean");

        assert_eq!(remaining_names(&library).len(), 4);
        assert!(String::from_utf8(out).expect("utf8").contains("nothing removed"));
    }

    #[test]
    fn dry_run_never_prompts() {
        let library = Library::standard();
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::<u8>::new();

        clean_catalog(&library.catalog_paths(), true, &mut prompt, &mut out).expect("clean");

        assert!(prompt.asked.is_empty());
        assert_eq!(remaining_names(&library).len(), 4);
    }

    #[test]
    fn missing_catalog_ends_quietly() {
        let library = Library::standard();
        let mut paths = library.catalog_paths();
        paths.data_dir = library.path("nowhere");
        let mut prompt = ScriptedPrompt::default();
        let mut out = Vec::<u8>::new();

        clean_catalog(&paths, false, &mut prompt, &mut out).expect("clean");

        let shown = String::from_utf8(out).expect("utf8");
        assert!(shown.starts_with("catalog not found at "));
        assert!(shown.ends_with("bye\n"));
    }

    #[test]
    fn removal_continues_past_missing_files() {
        let library = Library::standard();
        let paths = library.catalog_paths();
        let mut catalog = SqliteCatalog::open(&paths.catalog_path()).expect("open");
        let broken = find_broken(&catalog, &paths).expect("scan");
        std::fs::remove_file(library.path("configs/quake-2.yml")).expect("pre-remove");

        let removed = remove_broken(&mut catalog, &paths, &broken);
        catalog.commit().expect("commit");

        assert_eq!(removed, 2);
        assert!(!library.path("configs/tux-4.yml").exists());
    }
}
