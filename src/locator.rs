//! Locates the lock screen asset cache and enumerates the files in it.

use crate::config::{MACOS_ASSETS_PATH, WINDOWS_ASSETS_COMPONENTS};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Operating systems that keep a lock screen asset cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Other,
}

impl HostOs {
    /// The OS this binary was built for.
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Maps an OS identifier such as `windows`, `macos` or `Mac OS X`.
    pub fn from_identifier(identifier: &str) -> Self {
        let identifier = identifier.to_lowercase();
        if identifier.starts_with("windows") {
            HostOs::Windows
        } else if identifier.starts_with("mac") {
            HostOs::MacOs
        } else {
            HostOs::Other
        }
    }
}

/// Returns the asset cache directory for `os`, if it has one.
pub fn asset_root(os: HostOs, home: Option<&Path>) -> Option<PathBuf> {
    match os {
        HostOs::Windows => home.map(|home| {
            WINDOWS_ASSETS_COMPONENTS
                .iter()
                .fold(home.to_path_buf(), |path, component| path.join(component))
        }),
        HostOs::MacOs => Some(PathBuf::from(MACOS_ASSETS_PATH)),
        HostOs::Other => None,
    }
}

/// Lists every file in the asset cache of the running system.
pub fn locate() -> Vec<PathBuf> {
    locate_for(HostOs::current(), dirs::home_dir().as_deref())
}

/// Lists every file in the asset cache of `os`.
///
/// An unsupported OS or a missing directory simply yields no files.
pub fn locate_for(os: HostOs, home: Option<&Path>) -> Vec<PathBuf> {
    match asset_root(os, home) {
        Some(root) => collect_files(&root),
        None => {
            debug!("No lock screen asset cache on {:?}", os);
            Vec::new()
        }
    }
}

/// Recursively collects the regular files below `root`, depth first.
///
/// Links are followed; walkdir reports link loops as errors, which are skipped
/// like any other unreadable entry.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry below {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"data").unwrap();
    }

    #[test]
    fn identifies_host_os() {
        assert_eq!(HostOs::from_identifier("windows"), HostOs::Windows);
        assert_eq!(HostOs::from_identifier("Windows 10"), HostOs::Windows);
        assert_eq!(HostOs::from_identifier("macos"), HostOs::MacOs);
        assert_eq!(HostOs::from_identifier("Mac OS X"), HostOs::MacOs);
        assert_eq!(HostOs::from_identifier("linux"), HostOs::Other);
        assert_eq!(HostOs::from_identifier("freebsd"), HostOs::Other);
    }

    #[test]
    fn windows_root_lives_below_home() {
        let home = Path::new("/home/someone");
        let root = asset_root(HostOs::Windows, Some(home)).unwrap();

        assert!(root.starts_with(home));
        assert!(root.ends_with("LocalState/Assets"));
        assert!(
            root.components()
                .any(|c| c.as_os_str() == "Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy")
        );
        assert_eq!(asset_root(HostOs::Windows, None), None);
    }

    #[test]
    fn macos_root_is_fixed() {
        assert_eq!(
            asset_root(HostOs::MacOs, None),
            Some(PathBuf::from("/Library/Screen Savers/Default Collections"))
        );
    }

    #[test]
    fn unsupported_os_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));

        assert!(asset_root(HostOs::Other, Some(dir.path())).is_none());
        assert!(locate_for(HostOs::Other, Some(dir.path())).is_empty());
    }

    #[test]
    fn collects_every_file_in_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top"));
        touch(&dir.path().join("one/a"));
        touch(&dir.path().join("one/b.png"));
        touch(&dir.path().join("one/two/c"));
        touch(&dir.path().join("one/two/three/d.jpg"));
        fs::create_dir_all(dir.path().join("empty/deeper")).unwrap();

        let files = collect_files(dir.path());

        assert_eq!(files.len(), 5);
        assert!(files.iter().all(|f| f.starts_with(dir.path()) && f.is_file()));
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_files(&dir.path().join("does-not-exist")).is_empty());
    }

    #[test]
    fn locates_files_below_windows_asset_cache() {
        let home = tempfile::tempdir().unwrap();
        let root = asset_root(HostOs::Windows, Some(home.path())).unwrap();
        touch(&root.join("1b2c3d"));
        touch(&root.join("4e5f6a"));
        touch(&home.path().join("AppData/unrelated.png"));

        let files = locate_for(HostOs::Windows, Some(home.path()));

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.starts_with(&root)));
    }
}
