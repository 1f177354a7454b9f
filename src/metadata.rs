use crate::error::{QuickenvError, QuickenvResult};
use crate::fs_utils::write_atomically;
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const METADATA_FILE_NAME: &str = "quickenv.toml";
/// Written by releases before `quickenv.toml`: a banner line, then the alias.
const LEGACY_ALIAS_FILE_NAME: &str = "alias.txt";

/// Marker written into every environment quickenv creates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnvMetadata {
    pub name: String,
    pub alias: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub python: Option<String>,
    #[serde(default)]
    pub quickenv_version: Option<String>,
}

impl EnvMetadata {
    pub fn new(name: &str, alias: &str, python: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            created: Utc::now(),
            python,
            quickenv_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    /// Read the marker of the environment at `env`. `Ok(None)` when the environment
    /// has none (created by hand or by something else); a marker that does not parse is
    /// logged and treated the same way.
    pub fn load(env: &Path) -> QuickenvResult<Option<Self>> {
        let path = env.join(METADATA_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path).map_err(|e| QuickenvError::file_access(&path, e))?;
        match toml::from_str(&data) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                tracing::warn!(file = %path.display(), "ignoring unreadable metadata: {e}");
                Ok(None)
            }
        }
    }

    /// The alias the environment at `env` was created with, from its marker or, for older
    /// environments, from `alias.txt`.
    pub fn recorded_alias(env: &Path) -> QuickenvResult<Option<String>> {
        if let Some(meta) = Self::load(env)? {
            return Ok(Some(meta.alias));
        }
        let path = env.join(LEGACY_ALIAS_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path).map_err(|e| QuickenvError::file_access(&path, e))?;
        Ok(data
            .lines()
            .nth(1)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string))
    }

    pub fn save(&self, env: &Path) -> QuickenvResult<()> {
        let data = toml::to_string_pretty(self).map_err(|e| QuickenvError::Config {
            reason: format!("serializing metadata for '{}': {e}", self.name),
        })?;
        write_atomically(&env.join(METADATA_FILE_NAME), &data)
    }
}
