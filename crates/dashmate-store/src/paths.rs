//! Application data directory layout.
//!
//! DashboardMate keeps everything under a single dot-directory in the
//! user's home: the settings document, corrupt-file backups, logs, and
//! cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = ".dashboardmate";

/// Well-known files and directories under the application data root.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Layout rooted at `~/.dashboardmate`. `None` when no home directory
    /// can be determined.
    pub fn resolve() -> Option<Self> {
        dirs::home_dir().map(|home| Self::at(home.join(APP_DIR_NAME)))
    }

    /// Layout rooted at an explicit directory. Used by tests and portable
    /// installs.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Create the root and every well-known subdirectory.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.backups_dir())?;
        fs::create_dir_all(self.logs_dir())?;
        fs::create_dir_all(self.cache_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_the_root() {
        let paths = AppPaths::at("/tmp/dashmate-test");
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/dashmate-test/settings.json")
        );
        assert_eq!(
            paths.backups_dir(),
            PathBuf::from("/tmp/dashmate-test/backups")
        );
    }

    #[test]
    fn ensure_creates_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::at(dir.path().join("app"));
        paths.ensure().unwrap();
        assert!(paths.backups_dir().is_dir());
        assert!(paths.logs_dir().is_dir());
        assert!(paths.cache_dir().is_dir());
    }
}
