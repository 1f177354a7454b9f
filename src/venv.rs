use crate::error::{QuickenvError, QuickenvResult};
use crate::platform::platform;
use indicatif::{ProgressBar, ProgressStyle};
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// What a successful build learned about the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub python_version: Option<String>,
}

/// The host primitive that turns an empty path into a virtual environment.
pub trait EnvironmentBuilder {
    fn build(&self, name: &str, target: &Path) -> QuickenvResult<BuildReport>;
}

/// Runs `<python> -m venv <target>`.
#[derive(Debug, Clone)]
pub struct PythonVenv {
    python: Option<String>,
    with_pip: bool,
}

impl PythonVenv {
    pub fn new(python: Option<String>, with_pip: bool) -> Self {
        Self { python, with_pip }
    }

    fn interpreter(&self, name: &str) -> QuickenvResult<PathBuf> {
        let candidates: Vec<&str> = match &self.python {
            Some(p) => vec![p.as_str()],
            None => platform().python_candidates().to_vec(),
        };
        for c in &candidates {
            let as_path = Path::new(c);
            if as_path.components().count() > 1 {
                if as_path.is_file() {
                    return Ok(as_path.to_path_buf());
                }
                continue;
            }
            if let Ok(found) = which::which(c) {
                tracing::debug!(python = %found.display(), "resolved interpreter");
                return Ok(found);
            }
        }
        Err(QuickenvError::CreationError {
            name: name.to_string(),
            reason: format!("no Python interpreter found (tried {})", candidates.join(", ")),
        })
    }

    pub fn interpreter_version(python: &Path) -> Option<String> {
        let output = Command::new(python).arg("--version").output().ok()?;
        // Python 2 printed its version on stderr
        let text = format!(
            "{} {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        parse_python_version(&text)
    }
}

impl EnvironmentBuilder for PythonVenv {
    fn build(&self, name: &str, target: &Path) -> QuickenvResult<BuildReport> {
        let python = self.interpreter(name)?;
        let python_version = Self::interpreter_version(&python);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!(
            "Creating {name} with {} {}",
            python.display(),
            python_version.as_deref().unwrap_or("")
        ));
        pb.enable_steady_tick(Duration::from_millis(120));

        let mut cmd = Command::new(&python);
        cmd.arg("-m").arg("venv");
        if !self.with_pip {
            cmd.arg("--without-pip");
        }
        cmd.arg(target);
        tracing::info!(?cmd, "creating virtual environment");
        let output = cmd.output();
        pb.finish_and_clear();

        let output = output.map_err(|e| QuickenvError::CreationError {
            name: name.to_string(),
            reason: format!("failed to run {}: {e}", python.display()),
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} -m venv exited with {}", python.display(), output.status));
            return Err(QuickenvError::CreationError {
                name: name.to_string(),
                reason,
            });
        }
        Ok(BuildReport { python_version })
    }
}

fn parse_python_version(text: &str) -> Option<String> {
    for tok in text.split_whitespace() {
        if let Ok(v) = Version::parse(tok) {
            return Some(v.to_string());
        }
        // "3.13.0rc1" and friends are not semver; keep the numeric core
        let core: String = tok
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if core.matches('.').count() == 2 {
            if let Ok(v) = Version::parse(&core) {
                return Some(v.to_string());
            }
        }
    }
    None
}
