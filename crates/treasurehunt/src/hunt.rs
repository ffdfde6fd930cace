//! Hunt namespace management.
//!
//! A hunt is a named namespace mapping to one directory under the hunts
//! root. The directory owns the data file and the audit log; the
//! discoverable link lives next to the directory in the root. The hunt id
//! is used verbatim as the directory name.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// File name of the binary record file inside a hunt directory.
pub const DATA_FILE: &str = "treasures.bin";

/// File name of the audit log inside a hunt directory.
pub const LOG_FILE: &str = "logged_hunt";

/// Prefix of the discoverable log link in the hunts root.
pub const LINK_PREFIX: &str = "logged_hunt-";

/// A hunt namespace: an identifier plus the root it lives under.
///
/// Construction is cheap and touches no files; the directory is created
/// lazily by [`Hunt::ensure_dir`].
#[derive(Debug, Clone)]
pub struct Hunt {
    id: String,
    root: PathBuf,
}

impl Hunt {
    /// Address the hunt `id` under the given hunts root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }

    /// The hunt identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The hunt's directory.
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.id)
    }

    /// Path of the binary record file.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.dir().join(DATA_FILE)
    }

    /// Path of the audit log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir().join(LOG_FILE)
    }

    /// Path of the discoverable log link, next to the hunt directory.
    #[must_use]
    pub fn link_path(&self) -> PathBuf {
        self.root.join(format!("{LINK_PREFIX}{}", self.id))
    }

    /// Check whether the hunt directory exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.dir().is_dir()
    }

    /// Create the hunt directory if it does not exist yet.
    ///
    /// Returns `true` if the directory was created by this call, `false`
    /// if it already existed. The directory is created with mode 0755 on
    /// Unix. No files are created.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails for any reason other than the
    /// directory already existing.
    pub fn ensure_dir(&self) -> Result<bool> {
        let dir = self.dir();
        if dir.is_dir() {
            debug!("hunt directory {} already exists", dir.display());
            return Ok(false);
        }

        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        match builder.create(&dir) {
            Ok(()) => {
                info!("created hunt directory {}", dir.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(Error::DirectoryCreate { path: dir, source }),
        }
    }

    /// Remove the hunt: data file, log file, directory, and log link.
    ///
    /// Returns `false` without touching anything if the hunt directory
    /// does not exist. The four deletions are not atomic: if removing the
    /// directory fails (for example because a stray file is left in it),
    /// the error is surfaced and the already-deleted files stay deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if any deletion fails for a reason other than the
    /// target being absent. Directory removal does not tolerate a
    /// non-empty directory.
    pub fn remove(&self) -> Result<bool> {
        let dir = self.dir();
        if !dir.is_dir() {
            return Ok(false);
        }

        remove_file_tolerant(&self.data_path())?;
        remove_file_tolerant(&self.log_path())?;

        fs::remove_dir(&dir).map_err(|source| Error::DirectoryRemove { path: dir, source })?;

        remove_file_tolerant(&self.link_path())?;

        info!("removed hunt {}", self.id);
        Ok(true)
    }
}

/// Delete a file or symlink, treating an already-absent target as success.
fn remove_file_tolerant(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let hunt = Hunt::new("/data", "forest");
        assert_eq!(hunt.id(), "forest");
        assert_eq!(hunt.dir(), PathBuf::from("/data/forest"));
        assert_eq!(hunt.data_path(), PathBuf::from("/data/forest/treasures.bin"));
        assert_eq!(hunt.log_path(), PathBuf::from("/data/forest/logged_hunt"));
        assert_eq!(hunt.link_path(), PathBuf::from("/data/logged_hunt-forest"));
    }

    #[test]
    fn test_ensure_dir_creates_once() {
        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "forest");

        assert!(!hunt.exists());
        assert!(hunt.ensure_dir().unwrap());
        assert!(hunt.exists());

        // Second call is a no-op success.
        assert!(!hunt.ensure_dir().unwrap());
        assert!(hunt.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_owner_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "forest");
        hunt.ensure_dir().unwrap();

        let mode = fs::metadata(hunt.dir()).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn test_remove_missing_hunt() {
        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "ghost");
        assert!(!hunt.remove().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_deletes_all_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "forest");
        hunt.ensure_dir().unwrap();
        fs::write(hunt.data_path(), [0u8; 16]).unwrap();
        fs::write(hunt.log_path(), "[ts] added\n").unwrap();
        std::os::unix::fs::symlink(hunt.log_path(), hunt.link_path()).unwrap();

        assert!(hunt.remove().unwrap());
        assert!(!hunt.dir().exists());
        assert!(!hunt.data_path().exists());
        assert!(!hunt.log_path().exists());
        assert!(hunt.link_path().symlink_metadata().is_err());

        // Removing again reports not-found, not an error.
        assert!(!hunt.remove().unwrap());
    }

    #[test]
    fn test_remove_tolerates_missing_files() {
        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "bare");
        hunt.ensure_dir().unwrap();

        // Directory exists but no data file, log, or link were ever made.
        assert!(hunt.remove().unwrap());
        assert!(!hunt.dir().exists());
    }

    #[test]
    fn test_remove_surfaces_stray_file() {
        let root = tempfile::tempdir().unwrap();
        let hunt = Hunt::new(root.path(), "messy");
        hunt.ensure_dir().unwrap();
        fs::write(hunt.data_path(), [0u8; 16]).unwrap();
        fs::write(hunt.dir().join("stray.txt"), "leftover").unwrap();

        let err = hunt.remove().unwrap_err();
        assert!(matches!(err, Error::DirectoryRemove { .. }));

        // Partial state: data file already deleted, directory still there.
        assert!(hunt.dir().exists());
        assert!(!hunt.data_path().exists());
    }
}
