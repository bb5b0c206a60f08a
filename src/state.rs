use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Error, Result};

/// Tracks files the plugin staged on disk so they can be deleted once the
/// receiving app or share sheet is done with them.
#[derive(Clone)]
pub struct StagedFiles {
    root: PathBuf,
    files: Arc<Mutex<Vec<PathBuf>>>,
}

impl StagedFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The directory staged files are written to, created on first use.
    pub fn dir(&self) -> Result<&Path> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)
                .map_err(|e| Error::TempFile(format!("Failed to create temp dir: {}", e)))?;
        }
        Ok(&self.root)
    }

    pub fn track(&self, path: PathBuf) {
        log::debug!("tracking staged file {}", path.display());
        self.lock().push(path);
    }

    #[cfg(test)]
    pub fn tracked(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    /// Deletes the given files if they are tracked. Untracked paths are left alone.
    pub fn release(&self, paths: &[PathBuf]) {
        let mut files = self.lock();
        for path in paths {
            if let Some(index) = files.iter().position(|p| p == path) {
                let path = files.remove(index);
                if let Err(e) = std::fs::remove_file(&path) {
                    log::warn!("failed to delete staged file {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Deletes every tracked file.
    pub fn release_all(&self) {
        let mut files = self.lock();
        let mut errors = Vec::new();
        for path in files.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                errors.push(format!("{}: {}", path.display(), e));
            }
        }
        if !errors.is_empty() {
            log::warn!("errors during staged file cleanup: {:?}", errors);
        }
    }

    /// Deletes every tracked file and the staging directory itself,
    /// including leftovers from earlier runs.
    pub fn purge(&self) -> Result<()> {
        self.release_all();
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
                .map_err(|e| Error::TempFile(format!("Failed to cleanup temp dir: {}", e)))?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        match self.files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("staged file registry was poisoned");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StagedFiles;

    #[test]
    fn release_deletes_only_tracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFiles::new(dir.path());
        let tracked = dir.path().join("a.jpg");
        let untracked = dir.path().join("b.jpg");
        std::fs::write(&tracked, b"a").unwrap();
        std::fs::write(&untracked, b"b").unwrap();
        staged.track(tracked.clone());

        staged.release(&[tracked.clone(), untracked.clone()]);

        assert!(!tracked.exists());
        assert!(untracked.exists());
        assert!(staged.tracked().is_empty());
    }

    #[test]
    fn release_all_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFiles::new(dir.path());
        staged.track(dir.path().join("gone.mp4"));
        let kept = dir.path().join("kept.mp4");
        std::fs::write(&kept, b"v").unwrap();
        staged.track(kept.clone());

        staged.release_all();

        assert!(!kept.exists());
        assert!(staged.tracked().is_empty());
    }

    #[test]
    fn purge_removes_the_staging_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("share");
        let staged = StagedFiles::new(&root);
        std::fs::write(staged.dir().unwrap().join("old.bin"), b"x").unwrap();

        staged.purge().unwrap();

        assert!(!root.exists());
    }
}
