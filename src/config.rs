use crate::error::{QuickenvError, QuickenvResult};
use crate::platform::platform;
use fs_err as fs;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const ENV_DIRECTORY: &str = "QUICKENV_DIRECTORY";
pub const ENV_ALIASES_FILE: &str = "QUICKENV_ALIASES_FILE";
pub const ENV_CONFIG: &str = "QUICKENV_CONFIG";

const DESCRIPTIONS_FILE_NAME: &str = "descriptions.tsv";

/// Shell syntax used for alias lines.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// bash, zsh, sh: `alias name='cmd'`
    #[default]
    Posix,
    /// fish: `alias name 'cmd'`
    Fish,
}

impl Shell {
    pub fn default_activate_command(self) -> &'static str {
        match self {
            Shell::Posix => ". {activate}",
            Shell::Fish => "source {activate}",
        }
    }

    /// Quote `raw` so the shell reads it back as a single word. Plain paths pass through.
    pub fn quote(self, raw: &str) -> String {
        let plain = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "/._-+:,@%=".contains(c));
        if plain {
            return raw.to_string();
        }
        match self {
            Shell::Posix => format!("'{}'", raw.replace('\'', r"'\''")),
            Shell::Fish => format!("'{}'", raw.replace('\\', r"\\").replace('\'', r"\'")),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub envs_dir: Option<String>,
    #[serde(default)]
    pub aliases_file: Option<String>,
    #[serde(default)]
    pub descriptions_file: Option<String>,
    /// Interpreter command or path used to run `-m venv`
    #[serde(default)]
    pub python: Option<String>,
    #[serde(default)]
    pub shell: Option<Shell>,
    /// Template with `{activate}` (activate script) and `{path}` (env dir) placeholders
    #[serde(default)]
    pub activate_command: Option<String>,
    #[serde(default)]
    pub with_pip: Option<bool>,
}

/// Values given on the command line; they win over env vars and the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub envs_dir: Option<PathBuf>,
    pub aliases_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct QuickenvConfig {
    pub envs_dir: PathBuf,
    pub aliases_file: PathBuf,
    pub descriptions_file: PathBuf,
    pub python: Option<String>,
    pub shell: Shell,
    pub activate_command: String,
    pub with_pip: bool,
}

impl QuickenvConfig {
    pub fn load(overrides: &Overrides) -> QuickenvResult<Self> {
        Self::load_with(overrides, |key| std::env::var_os(key))
    }

    fn load_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> QuickenvResult<Self> {
        let explicit = overrides
            .config
            .clone()
            .or_else(|| lookup(ENV_CONFIG).map(PathBuf::from));
        let file = match explicit {
            Some(path) => Some(read_config_file(&path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(read_config_file(&path)?),
                _ => None,
            },
        };
        Self::resolve(overrides, file.unwrap_or_default(), lookup)
    }

    /// Layering: CLI flag > environment variable > config file > platform default.
    pub fn resolve(
        overrides: &Overrides,
        file: ConfigFile,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> QuickenvResult<Self> {
        let p = platform();
        let envs_dir = overrides
            .envs_dir
            .clone()
            .or_else(|| lookup(ENV_DIRECTORY).map(PathBuf::from))
            .or_else(|| file.envs_dir.as_deref().map(expand_tilde))
            .or_else(|| p.default_envs_dir())
            .ok_or_else(|| missing_home("environments directory"))?;
        let aliases_file = overrides
            .aliases_file
            .clone()
            .or_else(|| lookup(ENV_ALIASES_FILE).map(PathBuf::from))
            .or_else(|| file.aliases_file.as_deref().map(expand_tilde))
            .or_else(|| p.default_aliases_file())
            .ok_or_else(|| missing_home("aliases file"))?;
        let descriptions_file = file
            .descriptions_file
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| envs_dir.join(DESCRIPTIONS_FILE_NAME));
        let shell = file.shell.unwrap_or_default();
        let activate_command = file
            .activate_command
            .unwrap_or_else(|| shell.default_activate_command().to_string());
        if !activate_command.contains("{activate}") && !activate_command.contains("{path}") {
            return Err(QuickenvError::Config {
                reason: "activate_command must reference {activate} or {path}".into(),
            });
        }
        Ok(QuickenvConfig {
            envs_dir,
            aliases_file,
            descriptions_file,
            python: file.python,
            shell,
            activate_command,
            with_pip: file.with_pip.unwrap_or(true),
        })
    }

    pub fn env_path(&self, name: &str) -> PathBuf {
        self.envs_dir.join(name)
    }

    /// Render the command an alias expands to for the environment at `env`. Substituted
    /// paths are quoted for the configured shell.
    pub fn activation_command(&self, env: &Path) -> String {
        let activate = platform().activate_script(env, self.shell);
        self.activate_command
            .replace("{activate}", &self.shell.quote(&activate.to_string_lossy()))
            .replace("{path}", &self.shell.quote(&env.to_string_lossy()))
    }
}

fn read_config_file(path: &Path) -> QuickenvResult<ConfigFile> {
    let data =
        fs::read_to_string(path).map_err(|e| QuickenvError::file_access(path, e))?;
    toml::from_str(&data).map_err(|e| QuickenvError::Config {
        reason: format!("{}: {}", path.display(), e.message()),
    })
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quickenv").join("config.toml"))
}

fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = platform().home_dir() {
            return home;
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = platform().home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

fn missing_home(what: &str) -> QuickenvError {
    QuickenvError::Config {
        reason: format!("cannot determine the {what}: no home directory; pass it explicitly"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = ConfigFile {
            envs_dir: Some("/from/file".into()),
            aliases_file: Some("/file/aliases".into()),
            ..Default::default()
        };
        let env: HashMap<&str, &str> =
            [(ENV_DIRECTORY, "/from/env"), (ENV_ALIASES_FILE, "/env/aliases")].into();
        let lookup = |k: &str| env.get(k).map(OsString::from);

        let cfg = QuickenvConfig::resolve(&Overrides::default(), file.clone(), lookup).unwrap();
        assert_eq!(cfg.envs_dir, PathBuf::from("/from/env"));
        assert_eq!(cfg.aliases_file, PathBuf::from("/env/aliases"));

        let overrides = Overrides {
            envs_dir: Some("/from/cli".into()),
            ..Default::default()
        };
        let cfg = QuickenvConfig::resolve(&overrides, file.clone(), lookup).unwrap();
        assert_eq!(cfg.envs_dir, PathBuf::from("/from/cli"));

        let cfg = QuickenvConfig::resolve(&Overrides::default(), file, no_env).unwrap();
        assert_eq!(cfg.envs_dir, PathBuf::from("/from/file"));
        assert_eq!(
            cfg.descriptions_file,
            PathBuf::from("/from/file").join("descriptions.tsv")
        );
    }

    #[test]
    fn parses_config_toml() {
        let file: ConfigFile = toml::from_str(
            r#"
            envs_dir = "/opt/venvs"
            shell = "fish"
            python = "python3.12"
            with_pip = false
            "#,
        )
        .unwrap();
        let cfg = QuickenvConfig::resolve(&Overrides::default(), file, no_env).unwrap();
        assert_eq!(cfg.shell, Shell::Fish);
        assert_eq!(cfg.activate_command, "source {activate}");
        assert_eq!(cfg.python.as_deref(), Some("python3.12"));
        assert!(!cfg.with_pip);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("envdir = \"/x\"").is_err());
    }

    #[test]
    fn activate_command_needs_a_placeholder() {
        let file = ConfigFile {
            envs_dir: Some("/e".into()),
            aliases_file: Some("/a".into()),
            activate_command: Some("echo hi".into()),
            ..Default::default()
        };
        let err = QuickenvConfig::resolve(&Overrides::default(), file, no_env).unwrap_err();
        assert!(matches!(err, QuickenvError::Config { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn activation_command_renders_placeholders() {
        let file = ConfigFile {
            envs_dir: Some("/e".into()),
            aliases_file: Some("/a".into()),
            activate_command: Some("cd {path} && . {activate}".into()),
            ..Default::default()
        };
        let cfg = QuickenvConfig::resolve(&Overrides::default(), file, no_env).unwrap();
        assert_eq!(
            cfg.activation_command(&cfg.env_path("web")),
            "cd /e/web && . /e/web/bin/activate"
        );
    }

    #[cfg(unix)]
    #[test]
    fn activation_command_quotes_awkward_paths() {
        let overrides = Overrides {
            envs_dir: Some("/Users/Jane Doe/it's".into()),
            aliases_file: Some("/a".into()),
            config: None,
        };
        let cfg = QuickenvConfig::resolve(&overrides, ConfigFile::default(), no_env).unwrap();
        assert_eq!(
            cfg.activation_command(&cfg.env_path("web")),
            r". '/Users/Jane Doe/it'\''s/web/bin/activate'"
        );
    }

    #[test]
    fn quote_leaves_plain_words_alone() {
        assert_eq!(Shell::Posix.quote("/home/u/.quickenvs/web"), "/home/u/.quickenvs/web");
        assert_eq!(Shell::Posix.quote("a b"), "'a b'");
        assert_eq!(Shell::Posix.quote(""), "''");
        assert_eq!(Shell::Fish.quote(r"C:\it's"), r"'C:\\it\'s'");
    }
}
