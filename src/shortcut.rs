//! Windows shortcut (`.lnk`) resolution.

use std::path::{Path, PathBuf};

use crate::error::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTarget {
    pub display_name: String,
    /// Launch command relative to the games root, e.g. `./Doom/doom.exe`.
    pub raw_path: String,
    pub exists: bool,
}

pub trait ShortcutResolver {
    fn resolve(&self, path: &Path) -> Result<ShortcutTarget, SourceError>;
}

pub struct LnkShortcutResolver {
    games_root: PathBuf,
    link_prefix: String,
}

impl LnkShortcutResolver {
    pub fn new(games_root: PathBuf, link_prefix: &str) -> Self {
        Self {
            games_root,
            link_prefix: normalize_separators(link_prefix),
        }
    }

    /// Maps a Windows target path onto the games root.
    pub fn target_from_raw(&self, display_name: String, target: &str) -> ShortcutTarget {
        let target = normalize_separators(target);
        let relative = strip_prefix_ignore_case(&target, &self.link_prefix)
            .unwrap_or(&target)
            .trim_start_matches('/');

        ShortcutTarget {
            display_name,
            raw_path: format!("./{relative}"),
            exists: self.games_root.join(relative).exists(),
        }
    }
}

impl ShortcutResolver for LnkShortcutResolver {
    fn resolve(&self, path: &Path) -> Result<ShortcutTarget, SourceError> {
        if !path.is_file() {
            return Err(SourceError::ResourceMissing {
                path: path.to_path_buf(),
            });
        }

        let link = lnk::ShellLink::open(path)
            .map_err(|err| SourceError::malformed(path, format!("{err:?}")))?;

        let target = link
            .link_info()
            .as_ref()
            .and_then(|info| info.local_base_path().clone())
            .or_else(|| link.relative_path().clone())
            .ok_or_else(|| SourceError::malformed(path, "shortcut has no target path"))?;

        Ok(self.target_from_raw(display_name(path), &target))
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_shortcut(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "lnk")
}

fn normalize_separators(value: &str) -> String {
    value.replace('\\', "/")
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn target_is_rebased_onto_games_root() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(root.path().join("Doom")).expect("mkdir");
        fs::write(root.path().join("Doom").join("doom.exe"), b"MZ").expect("write");

        let resolver = LnkShortcutResolver::new(root.path().to_path_buf(), "C:/Games/");
        let target = resolver.target_from_raw("Doom".to_string(), r"C:\Games\Doom\doom.exe");

        assert_eq!(target.raw_path, "./Doom/doom.exe");
        assert!(target.exists);

        let gone = resolver.target_from_raw("Quake".to_string(), r"c:\games\Quake\quake.exe");
        assert_eq!(gone.raw_path, "./Quake/quake.exe");
        assert!(!gone.exists);
    }

    #[test]
    fn target_outside_prefix_is_kept_whole() {
        let resolver = LnkShortcutResolver::new(PathBuf::from("/nonexistent"), "C:/Games/");
        let target = resolver.target_from_raw("X".to_string(), r"D:\Other\x.exe");
        assert_eq!(target.raw_path, "./D:/Other/x.exe");
        assert!(!target.exists);
    }

    #[test]
    fn vanished_shortcut_is_resource_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let link = dir.path().join("Broken Game.lnk");

        let resolver = LnkShortcutResolver::new(dir.path().to_path_buf(), "C:/Games/");
        let err = resolver.resolve(&link).expect_err("missing link");
        assert!(matches!(err, SourceError::ResourceMissing { .. }));
    }

    #[test]
    fn display_name_is_the_file_stem() {
        assert_eq!(display_name(Path::new("/links/Half-Life 2.lnk")), "Half-Life 2");
        assert!(is_shortcut(Path::new("/links/Half-Life 2.lnk")));
        assert!(!is_shortcut(Path::new("/links/readme.txt")));
    }
}
