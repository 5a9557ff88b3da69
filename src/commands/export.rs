use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::catalog::{Catalog, SqliteCatalog};
use crate::cli::{EntrySource, ExportArgs};
use crate::commands::report_unavailable;
use crate::context::RunContext;
use crate::model::{CheckedEntry, RunSummary};
use crate::prompt::{Prompt, TerminalPrompt};
use crate::reconcile::classify::{
    ConfidencePartition, StructuralPartition, partition_confidence, partition_structural,
};
use crate::reconcile::matcher::AssetMatcher;
use crate::reconcile::report::{ExportHeader, emit_diagnostic_log, emit_metadata};
use crate::reconcile::session::ResolutionSession;
use crate::reconcile::{check_catalog_entry, check_shortcut, match_entry, sort_by_name};
use crate::shortcut::{LnkShortcutResolver, is_shortcut};
use crate::util::{list_file_names, now_utc_string, write_json_pretty};

pub fn run(args: ExportArgs) -> Result<()> {
    let context = RunContext::from_export_args(&args)?;
    let header = ExportHeader {
        collection: args.collection.clone(),
        shortname: args.shortname.clone(),
        launch: args.launch.clone(),
    };

    let mut prompt = TerminalPrompt::stdio();
    let mut out = io::stdout();
    let Some(summary) = export(&context, args.source, &header, &mut prompt, &mut out)? else {
        return Ok(());
    };

    if let Some(summary_path) = &args.summary_path {
        write_json_pretty(summary_path, &summary)?;
        info!(path = %summary_path.display(), "wrote run summary");
    }

    Ok(())
}

/// Runs the whole reconciliation. Returns `None` when the entry source is
/// unavailable and there is nothing to reconcile.
pub(crate) fn export(
    context: &RunContext,
    source: EntrySource,
    header: &ExportHeader,
    prompt: &mut impl Prompt,
    out: &mut impl Write,
) -> Result<Option<RunSummary>> {
    let filter_broken = prompt.confirm("Filter broken links", true)?;
    let Some(entries) = collect_entries(context, source, out)? else {
        writeln!(out, "bye")?;
        return Ok(None);
    };
    let entry_count = entries.len();

    let StructuralPartition { healthy, broken } = partition_structural(entries);
    info!(good = healthy.len(), broken = broken.len(), "classified entries");

    let (to_match, broken) = if filter_broken {
        (healthy, broken)
    } else {
        (healthy.into_iter().chain(broken).collect(), Vec::new())
    };

    let matcher = AssetMatcher::new()?;
    let mut candidates = to_match
        .into_iter()
        .map(|entry| match_entry(&matcher, &context.assets, entry))
        .collect::<Vec<_>>();
    sort_by_name(&mut candidates);

    let ConfidencePartition { matched, ambiguous } = partition_confidence(candidates);
    let ambiguous_count = ambiguous.len();
    info!(matched = matched.len(), ambiguous = ambiguous_count, "matched media");

    let outcome = ResolutionSession::new(prompt).run(ambiguous)?;
    info!(
        fixed = outcome.fixed.len(),
        bad = outcome.bad.len(),
        cancelled = outcome.cancelled,
        "resolution finished"
    );

    let metadata_path = emit_metadata(
        prompt,
        out,
        &context.output_dir,
        header,
        &matched,
        &outcome.fixed,
    )?;
    let log_path = emit_diagnostic_log(prompt, out, &context.output_dir, &outcome.bad, &broken)?;
    writeln!(out, "done")?;

    Ok(Some(RunSummary {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source: source.as_str().to_string(),
        entry_count,
        broken: broken.len(),
        matched: matched.len(),
        ambiguous: ambiguous_count,
        fixed: outcome.fixed.len(),
        bad: outcome.bad.len(),
        session_cancelled: outcome.cancelled,
        metadata_path: metadata_path.map(|path| path.display().to_string()),
        log_path: log_path.map(|path| path.display().to_string()),
    }))
}

fn collect_entries(
    context: &RunContext,
    source: EntrySource,
    out: &mut impl Write,
) -> Result<Option<Vec<CheckedEntry>>> {
    match source {
        EntrySource::Shortcuts => {
            let Some(names) = list_file_names(&context.shortcut_dir)? else {
                writeln!(
                    out,
                    "shortcut directory not found at {}",
                    context.shortcut_dir.display()
                )?;
                return Ok(None);
            };

            let links = names
                .into_iter()
                .map(|name| context.shortcut_dir.join(name))
                .filter(|path| is_shortcut(path))
                .collect::<Vec<_>>();
            info!(
                count = links.len(),
                path = %context.shortcut_dir.display(),
                "found shortcuts"
            );

            let resolver = LnkShortcutResolver::new(context.games_root.clone(), &context.link_prefix);
            Ok(Some(
                links.iter().map(|link| check_shortcut(&resolver, link)).collect(),
            ))
        }
        EntrySource::Catalog => {
            let catalog_path = context.catalog.catalog_path();
            let catalog = match SqliteCatalog::open(&catalog_path) {
                Ok(catalog) => catalog,
                Err(err) => {
                    report_unavailable(out, "catalog", &err)?;
                    return Ok(None);
                }
            };

            let entries = catalog.list_entries()?;
            info!(count = entries.len(), path = %catalog_path.display(), "found catalog entries");
            Ok(Some(
                entries
                    .iter()
                    .map(|entry| {
                        check_catalog_entry(
                            entry,
                            &context.catalog.config_dir,
                            &context.catalog.search_dirs,
                        )
                    })
                    .collect(),
            ))
        }
    }
}
