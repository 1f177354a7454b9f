use crate::config::Shell;
use crate::error::{QuickenvError, QuickenvResult};
use crate::fs_utils::{read_or_empty, write_atomically};
use fs_err as fs;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trailing comment that marks a line as managed by quickenv for one environment.
pub const MARKER: &str = "# quickenv:";

// alias NAME='CMD'  or  alias NAME 'CMD', optionally tagged
static ALIAS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*alias\s+([A-Za-z0-9._-]+)(?:=|\s+)(.*?)\s*(?:#\s*quickenv:([A-Za-z0-9._-]+))?\s*$")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub env: String,
    pub command: String,
}

/// The shell startup file holding one tagged alias line per environment.
#[derive(Debug, Clone)]
pub struct AliasFile {
    path: PathBuf,
    shell: Shell,
}

impl AliasFile {
    pub fn new(path: impl Into<PathBuf>, shell: Shell) -> Self {
        AliasFile {
            path: path.into(),
            shell,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render_line(&self, env: &str, alias: &str, command: &str) -> String {
        match self.shell {
            Shell::Posix => format!(
                "alias {alias}='{}' {MARKER}{env}",
                command.replace('\'', r"'\''")
            ),
            Shell::Fish => format!(
                "alias {alias} '{}' {MARKER}{env}",
                command.replace('\\', r"\\").replace('\'', r"\'")
            ),
        }
    }

    /// All quickenv-managed lines, in file order.
    pub fn entries(&self) -> QuickenvResult<Vec<AliasEntry>> {
        let data = read_or_empty(&self.path)?;
        Ok(data
            .lines()
            .filter_map(|l| parse_tagged(l, self.shell))
            .collect())
    }

    /// True when `alias` is already defined by a line that is not managed for `env`.
    pub fn is_taken(&self, alias: &str, env: &str) -> QuickenvResult<bool> {
        let data = read_or_empty(&self.path)?;
        Ok(data.lines().any(|line| match ALIAS_LINE.captures(line) {
            Some(caps) if &caps[1] == alias => caps.get(3).map(|t| t.as_str()) != Some(env),
            _ => false,
        }))
    }

    /// Register `alias` for `env`. An existing managed line for `env` is replaced in place
    /// (atomic rewrite); otherwise the line is appended.
    pub fn upsert(&self, env: &str, alias: &str, command: &str) -> QuickenvResult<()> {
        let line = self.render_line(env, alias, command);
        let existing = read_or_empty(&self.path)?;
        if existing.lines().any(|l| is_tagged_for(l, env)) {
            let mut replaced = false;
            let mut out = String::with_capacity(existing.len() + line.len());
            for l in existing.lines() {
                if is_tagged_for(l, env) {
                    if !replaced {
                        out.push_str(&line);
                        out.push('\n');
                        replaced = true;
                    }
                    continue;
                }
                out.push_str(l);
                out.push('\n');
            }
            tracing::debug!(file = %self.path.display(), env, "replacing alias line");
            return write_atomically(&self.path, &out);
        }
        self.append(&existing, &line)
    }

    /// Drop every managed line for `env`, plus `legacy` (an exact untagged line written by
    /// older releases) when given. Returns how many lines were removed.
    pub fn remove(&self, env: &str, legacy: Option<&str>) -> QuickenvResult<usize> {
        let existing = read_or_empty(&self.path)?;
        let mut removed = 0;
        let mut out = String::with_capacity(existing.len());
        for l in existing.lines() {
            if is_tagged_for(l, env) || legacy.is_some_and(|leg| l.trim_end() == leg) {
                removed += 1;
                continue;
            }
            out.push_str(l);
            out.push('\n');
        }
        if removed > 0 {
            tracing::debug!(file = %self.path.display(), env, removed, "removing alias lines");
            write_atomically(&self.path, &out)?;
        }
        Ok(removed)
    }

    fn append(&self, existing: &str, line: &str) -> QuickenvResult<()> {
        let access = |e| QuickenvError::file_access(&self.path, e);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            crate::fs_utils::ensure_directory_exists(parent)?;
        }
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(access)?;
        let mut buf = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');
        f.write_all(buf.as_bytes()).map_err(access)?;
        f.flush().map_err(access)?;
        tracing::debug!(file = %self.path.display(), "appended alias line");
        Ok(())
    }
}

/// Untagged line written by quickenv releases that predate the marker comment.
pub fn legacy_line(alias: &str, env_path: &Path) -> String {
    format!("alias {alias}=\". {}/bin/activate\"", env_path.display())
}

fn is_tagged_for(line: &str, env: &str) -> bool {
    ALIAS_LINE
        .captures(line)
        .and_then(|c| c.get(3))
        .is_some_and(|t| t.as_str() == env)
}

fn parse_tagged(line: &str, shell: Shell) -> Option<AliasEntry> {
    let caps = ALIAS_LINE.captures(line)?;
    let env = caps.get(3)?.as_str().to_string();
    Some(AliasEntry {
        alias: caps[1].to_string(),
        env,
        command: unquote(&caps[2], shell),
    })
}

fn unquote(raw: &str, shell: Shell) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        let inner = &raw[1..raw.len() - 1];
        return match shell {
            Shell::Posix => inner.replace(r"'\''", "'"),
            Shell::Fish => unescape_fish(inner),
        };
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return raw[1..raw.len() - 1].to_string();
    }
    raw.to_string()
}

// inside fish single quotes only \\ and \' are escapes
fn unescape_fish(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next_if(|n| matches!(*n, '\\' | '\'')) {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
