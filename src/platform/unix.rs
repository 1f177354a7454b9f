use crate::config::Shell;
use crate::platform::PlatformOps;
use std::path::{Path, PathBuf};

pub static UNIX_PLATFORM: Unix = Unix;

pub struct Unix;

impl PlatformOps for Unix {
    fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os("HOME").map(PathBuf::from).or_else(dirs::home_dir)
    }
    fn default_envs_dir(&self) -> Option<PathBuf> {
        self.home_dir().map(|h| h.join(".quickenvs"))
    }
    fn default_aliases_file(&self) -> Option<PathBuf> {
        self.home_dir().map(|h| h.join(".bash_aliases"))
    }
    fn venv_bin_dir(&self, env: &Path) -> PathBuf {
        env.join("bin")
    }
    fn activate_script(&self, env: &Path, shell: Shell) -> PathBuf {
        let script = match shell {
            Shell::Posix => "activate",
            Shell::Fish => "activate.fish",
        };
        self.venv_bin_dir(env).join(script)
    }
    fn python_candidates(&self) -> &'static [&'static str] {
        &["python3", "python"]
    }
}
