pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

use crate::config::Shell;
use std::path::{Path, PathBuf};

pub trait PlatformOps: Sync + Send {
    fn home_dir(&self) -> Option<PathBuf>;
    fn default_envs_dir(&self) -> Option<PathBuf>;
    fn default_aliases_file(&self) -> Option<PathBuf>;
    /// Directory inside a venv holding its executables and activate scripts.
    fn venv_bin_dir(&self, env: &Path) -> PathBuf;
    fn activate_script(&self, env: &Path, shell: Shell) -> PathBuf;
    /// Interpreters tried, in order, when none is configured.
    fn python_candidates(&self) -> &'static [&'static str];
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;
