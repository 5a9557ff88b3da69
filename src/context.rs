use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{CatalogArgs, ExportArgs};
use crate::reconcile::validate::default_search_dirs;
use crate::util::{home_dir, list_file_names};

pub const CATALOG_FILENAME: &str = "pga.db";

/// Where the catalog, its per-game configs and its artwork live.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    pub search_dirs: Vec<PathBuf>,
}

impl CatalogPaths {
    pub fn from_args(args: &CatalogArgs, home: &Path) -> Self {
        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| home.join(".local/share/lutris"));
        let config_dir = args
            .config_dir
            .clone()
            .unwrap_or_else(|| home.join(".config/lutris/games"));
        let search_dirs = if args.search_dirs.is_empty() {
            default_search_dirs()
        } else {
            args.search_dirs.clone()
        };

        Self {
            data_dir,
            config_dir,
            search_dirs,
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILENAME)
    }

    pub fn banner_dir(&self) -> PathBuf {
        self.data_dir.join("banners")
    }

    pub fn coverart_dir(&self) -> PathBuf {
        self.data_dir.join("coverart")
    }
}

/// Candidate asset file names, loaded once and shared by every match.
#[derive(Debug, Clone, Default)]
pub struct AssetUniverses {
    pub screenshots: Vec<String>,
    pub banners: Vec<String>,
}

impl AssetUniverses {
    pub fn load(media_dir: &Path) -> Result<Self> {
        let screenshots = load_universe(&media_dir.join("coverart"))?;
        let banners = load_universe(&media_dir.join("banners"))?;
        info!(
            screenshots = screenshots.len(),
            banners = banners.len(),
            "loaded media assets"
        );
        Ok(Self {
            screenshots,
            banners,
        })
    }
}

fn load_universe(dir: &Path) -> Result<Vec<String>> {
    match list_file_names(dir)? {
        Some(names) => Ok(names),
        None => {
            warn!(path = %dir.display(), "media directory missing");
            Ok(Vec::new())
        }
    }
}

/// Everything the export pipeline needs, built once per run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub catalog: CatalogPaths,
    pub games_root: PathBuf,
    pub shortcut_dir: PathBuf,
    pub link_prefix: String,
    pub output_dir: PathBuf,
    pub assets: AssetUniverses,
}

impl RunContext {
    pub fn from_export_args(args: &ExportArgs) -> Result<Self> {
        let home = home_dir()?;
        let games_root = args
            .games_root
            .clone()
            .unwrap_or_else(|| home.join("Games"));
        let shortcut_dir = args
            .shortcut_dir
            .clone()
            .unwrap_or_else(|| games_root.join("_shortcuts").join("d_games"));
        let media_dir = args
            .media_dir
            .clone()
            .unwrap_or_else(|| games_root.join("media"));

        Ok(Self {
            catalog: CatalogPaths::from_args(&args.catalog, &home),
            assets: AssetUniverses::load(&media_dir)?,
            games_root,
            shortcut_dir,
            link_prefix: args.link_prefix.clone(),
            output_dir: args.output_dir.clone(),
        })
    }
}
