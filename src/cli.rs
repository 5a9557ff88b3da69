use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "gamelib-reconcile",
    version,
    about = "Reconcile a local game library against launch targets and media assets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find catalog entries whose launch target is gone and offer to remove them.
    Clean(CleanArgs),
    /// Match entries against media assets and write a metadata export.
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Directory holding pga.db, banners/ and coverart/ (default ~/.local/share/lutris).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding per-game <configpath>.yml files (default ~/.config/lutris/games).
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Executable search directory; defaults to the entries of PATH.
    #[arg(long = "search-dir")]
    pub search_dirs: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum EntrySource {
    Shortcuts,
    Catalog,
}

impl EntrySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shortcuts => "shortcuts",
            Self::Catalog => "catalog",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = EntrySource::Shortcuts)]
    pub source: EntrySource,

    /// Root that shortcut targets are checked against (default ~/Games).
    #[arg(long)]
    pub games_root: Option<PathBuf>,

    /// Directory of .lnk files (default <games-root>/_shortcuts/d_games).
    #[arg(long)]
    pub shortcut_dir: Option<PathBuf>,

    #[arg(long, default_value = "C:/Games/")]
    pub link_prefix: String,

    /// Directory holding coverart/ and banners/ (default <games-root>/media).
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = "Windows Games")]
    pub collection: String,

    #[arg(long, default_value = "windows")]
    pub shortname: String,

    #[arg(long, default_value = "'{file.path}'")]
    pub launch: String,

    #[arg(long)]
    pub summary_path: Option<PathBuf>,
}
