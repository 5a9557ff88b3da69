use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::model::{CheckedEntry, MatchCandidate};
use crate::prompt::Prompt;
use crate::util::write_text;

pub(crate) const METADATA_FILENAME: &str = "metadata.pegasus.txt";
pub(crate) const LOG_FILENAME: &str = "missing.txt";

const SAVE_DEFAULT: &str = "Yes, metadata.pegasus.txt";
const SAVE_SPECIFY: &str = "Yes, specify";
const SAVE_PRINT_ONLY: &str = "No, just print";

#[derive(Debug, Clone)]
pub(crate) struct ExportHeader {
    pub collection: String,
    pub shortname: String,
    pub launch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SaveTarget {
    Default,
    Custom(PathBuf),
    PrintOnly,
}

pub(crate) fn render_metadata<'a>(
    header: &ExportHeader,
    records: impl IntoIterator<Item = &'a MatchCandidate>,
) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "collection: {}\nshortname: {}\nlaunch: {}\n\n",
        header.collection, header.shortname, header.launch
    );

    for record in records {
        let screenshot = record.screenshot.as_ref().map_or("", |asset| asset.name.as_str());
        let banner = record.banner.as_ref().map_or("", |asset| asset.name.as_str());
        let _ = write!(
            out,
            "game: {}\nfile: {}\nassets.screenshot: ./media/{}\nassets.banner: ./media/{}\n\n",
            record.entry.name, record.entry.command, screenshot, banner
        );
    }

    out
}

pub(crate) fn render_diagnostic_log(bad: &[MatchCandidate], broken: &[CheckedEntry]) -> String {
    let mut out = String::from("#############\nMISSING MEDIA\n#############\n");
    let _ = writeln!(out, "{} items", bad.len());
    for candidate in bad {
        push_item(&mut out, &candidate.entry);
    }

    out.push_str("\n\n############\nBROKEN LINKS\n############\n");
    let _ = writeln!(out, "{} items", broken.len());
    for entry in broken {
        push_item(&mut out, entry);
    }

    out
}

fn push_item(out: &mut String, entry: &CheckedEntry) {
    let _ = writeln!(out, "{} -> \"{}\"", entry.name, entry.command);
}

pub(crate) fn choose_save_target(prompt: &mut impl Prompt) -> Result<SaveTarget> {
    let options = [SAVE_DEFAULT, SAVE_SPECIFY, SAVE_PRINT_ONLY].map(String::from);
    let target = match prompt.choose_one("Save metadata?", &options)? {
        0 => SaveTarget::Default,
        1 => SaveTarget::Custom(read_filename(prompt)?),
        _ => SaveTarget::PrintOnly,
    };
    Ok(target)
}

/// Asks until a non-blank file name is given.
fn read_filename(prompt: &mut impl Prompt) -> Result<PathBuf> {
    loop {
        let name = prompt.read_string("filename")?;
        let name = name.trim();
        if !name.is_empty() {
            return Ok(PathBuf::from(name));
        }
    }
}

/// Renders the export, then writes or prints it per the user's choice.
/// Returns the path written, if any.
pub(crate) fn emit_metadata(
    prompt: &mut impl Prompt,
    out: &mut impl Write,
    output_dir: &Path,
    header: &ExportHeader,
    matched: &[MatchCandidate],
    fixed: &[MatchCandidate],
) -> Result<Option<PathBuf>> {
    let metadata = render_metadata(header, matched.iter().chain(fixed));

    let path = match choose_save_target(prompt)? {
        SaveTarget::Default => output_dir.join(METADATA_FILENAME),
        SaveTarget::Custom(path) => output_dir.join(path),
        SaveTarget::PrintOnly => {
            write!(out, "{metadata}")?;
            return Ok(None);
        }
    };

    write_text(&path, &metadata)?;
    info!(
        path = %path.display(),
        games = matched.len() + fixed.len(),
        "wrote metadata export"
    );
    Ok(Some(path))
}

/// Always prints the log; writes it only when confirmed.
pub(crate) fn emit_diagnostic_log(
    prompt: &mut impl Prompt,
    out: &mut impl Write,
    output_dir: &Path,
    bad: &[MatchCandidate],
    broken: &[CheckedEntry],
) -> Result<Option<PathBuf>> {
    let log = render_diagnostic_log(bad, broken);

    let written = if prompt.confirm("Save missing.txt file?", true)? {
        let path = output_dir.join(LOG_FILENAME);
        write_text(&path, &log)?;
        info!(path = %path.display(), "wrote diagnostic log");
        Some(path)
    } else {
        None
    };

    write!(out, "{log}")?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::model::{EntryOrigin, ScoredAsset, ValidationResult};
    use crate::prompt::scripted::{Answer, ScriptedPrompt};

    fn header() -> ExportHeader {
        ExportHeader {
            collection: "Windows Games".to_string(),
            shortname: "windows".to_string(),
            launch: "'{file.path}'".to_string(),
        }
    }

    fn entry(name: &str, command: &str) -> CheckedEntry {
        CheckedEntry {
            name: name.to_string(),
            command: command.to_string(),
            validation: ValidationResult::Valid,
            origin: EntryOrigin::Shortcut {
                path: format!("{name}.lnk").into(),
            },
        }
    }

    fn record(name: &str, shot: &str, banner: &str) -> MatchCandidate {
        MatchCandidate {
            entry: entry(name, &format!("./{name}/{name}.exe")),
            screenshot: Some(ScoredAsset {
                name: shot.to_string(),
                score: 95,
            }),
            banner: Some(ScoredAsset {
                name: banner.to_string(),
                score: 90,
            }),
            shortlist: Vec::new(),
        }
    }

    #[test]
    fn empty_export_is_just_the_header() {
        let rendered = render_metadata(&header(), std::iter::empty::<&MatchCandidate>());
        assert_eq!(
            rendered,
            "collection: Windows Games\nshortname: windows\nlaunch: '{file.path}'\n\n"
        );
        assert!(!rendered.contains("game:"));
    }

    #[test]
    fn export_lists_matched_then_fixed_in_order() {
        let matched = vec![record("Doom", "Doom.png", "Doom.jpg")];
        let fixed = vec![record("Quake", "Quake 1.png", "Quake.jpg")];

        let rendered = render_metadata(&header(), matched.iter().chain(&fixed));
        let expected_tail = "game: Doom\nfile: ./Doom/Doom.exe\n\
             assets.screenshot: ./media/Doom.png\nassets.banner: ./media/Doom.jpg\n\n\
             game: Quake\nfile: ./Quake/Quake.exe\n\
             assets.screenshot: ./media/Quake 1.png\nassets.banner: ./media/Quake.jpg\n\n";
        assert!(rendered.ends_with(expected_tail));
    }

    #[test]
    fn empty_log_reports_zero_items_in_both_sections() {
        let log = render_diagnostic_log(&[], &[]);
        assert_eq!(
            log,
            "#############\nMISSING MEDIA\n#############\n0 items\n\
             \n\n############\nBROKEN LINKS\n############\n0 items\n"
        );
    }

    #[test]
    fn log_lines_show_name_and_raw_command() {
        let bad = vec![record("Thief", "x.png", "y.png")];
        let broken = vec![entry("Gone", "./Gone/gone.exe")];

        let log = render_diagnostic_log(&bad, &broken);
        assert!(log.contains("1 items\nThief -> \"./Thief/Thief.exe\"\n"));
        assert!(log.ends_with("1 items\nGone -> \"./Gone/gone.exe\"\n"));
    }

    #[test]
    fn print_only_writes_nothing_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut prompt = ScriptedPrompt::new([Answer::Choice(2)]);
        let mut out = Vec::<u8>::new();

        let written = emit_metadata(&mut prompt, &mut out, dir.path(), &header(), &[], &[])
            .expect("emit");
        assert!(written.is_none());
        assert!(!dir.path().join(METADATA_FILENAME).exists());
        assert!(String::from_utf8(out).expect("utf8").starts_with("collection: "));
    }

    #[test]
    fn specify_asks_for_a_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut prompt = ScriptedPrompt::new([
            Answer::Choice(1),
            Answer::Text("custom.txt".to_string()),
        ]);

        let written = emit_metadata(&mut prompt, &mut std::io::sink(), dir.path(), &header(), &[], &[])
            .expect("emit");
        let path = written.expect("written");
        assert_eq!(path, dir.path().join("custom.txt"));
        assert!(fs::read_to_string(path).expect("read").starts_with("collection: "));
    }

    #[test]
    fn blank_filename_is_asked_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut prompt = ScriptedPrompt::new([
            Answer::Choice(1),
            Answer::Text(String::new()),
            Answer::Text("  ".to_string()),
            Answer::Text("custom.txt".to_string()),
        ]);

        let written = emit_metadata(&mut prompt, &mut std::io::sink(), dir.path(), &header(), &[], &[])
            .expect("emit");
        assert_eq!(written, Some(dir.path().join("custom.txt")));
        assert_eq!(prompt.asked.iter().filter(|asked| *asked == "filename").count(), 3);
    }

    #[test]
    fn log_is_printed_even_when_not_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut prompt = ScriptedPrompt::new([Answer::Confirm(false)]);
        let mut out = Vec::<u8>::new();

        let written =
            emit_diagnostic_log(&mut prompt, &mut out, dir.path(), &[], &[]).expect("emit");
        assert!(written.is_none());
        assert!(!dir.path().join(LOG_FILENAME).exists());
        assert!(String::from_utf8(out).expect("utf8").contains("MISSING MEDIA"));
    }

    #[test]
    fn confirmed_log_lands_in_output_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut prompt = ScriptedPrompt::new([Answer::Confirm(true)]);

        let written = emit_diagnostic_log(&mut prompt, &mut std::io::sink(), dir.path(), &[], &[])
            .expect("emit")
            .expect("written");
        assert_eq!(written, dir.path().join(LOG_FILENAME));
        assert!(fs::read_to_string(written).expect("read").contains("BROKEN LINKS"));
    }
}
