use crate::config::Shell;
use crate::platform::PlatformOps;
use std::path::{Path, PathBuf};

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    fn home_dir(&self) -> Option<PathBuf> { std::env::var_os("USERPROFILE").map(PathBuf::from).or_else(dirs::home_dir) }
    fn default_envs_dir(&self) -> Option<PathBuf> { self.home_dir().map(|h| h.join(".quickenvs")) }
    // Git Bash reads ~/.bash_aliases through ~/.bashrc just like on unix
    fn default_aliases_file(&self) -> Option<PathBuf> { self.home_dir().map(|h| h.join(".bash_aliases")) }
    fn venv_bin_dir(&self, env: &Path) -> PathBuf { env.join("Scripts") }
    fn activate_script(&self, env: &Path, shell: Shell) -> PathBuf { match shell { Shell::Posix => self.venv_bin_dir(env).join("activate"), Shell::Fish => self.venv_bin_dir(env).join("activate.fish") } }
    fn python_candidates(&self) -> &'static [&'static str] { &["python", "py", "python3"] }
}
