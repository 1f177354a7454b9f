use crate::error::{io_context, QuickenvError, QuickenvResult};
use fs_err as fs;
use std::path::{Path, PathBuf};

pub const LOCK_FILE_NAME: &str = ".quickenv.lock";

/// Exclusive advisory lock over the envs dir, the aliases file and the description store.
///
/// The aliases file is replaced by rename when lines are rewritten, so the lock lives on a
/// sidecar file that never moves. Released on drop.
#[derive(Debug)]
pub struct MutationLock {
    file: fs::File,
    path: PathBuf,
}

impl MutationLock {
    pub fn acquire(envs_dir: &Path) -> QuickenvResult<Self> {
        let path = envs_dir.join(LOCK_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| QuickenvError::file_access(&path, e))?;
        if let Err(e) = file.file().try_lock() {
            tracing::info!(lock = %path.display(), "waiting for another quickenv process: {e}");
            file.file()
                .lock()
                .map_err(|e| QuickenvError::file_access(&path, io_context("lock", &path, e)))?;
        }
        tracing::debug!(lock = %path.display(), "acquired mutation lock");
        Ok(MutationLock { file, path })
    }
}

impl Drop for MutationLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.file().unlock() {
            tracing::warn!(lock = %self.path.display(), "failed to release lock: {e}");
        }
    }
}
