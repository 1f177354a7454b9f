use crate::aliases::{legacy_line, AliasEntry, AliasFile};
use crate::config::QuickenvConfig;
use crate::descriptions::DescriptionStore;
use crate::error::{QuickenvError, QuickenvResult};
use crate::fs_utils::ensure_directory_exists;
use crate::lock::{MutationLock, LOCK_FILE_NAME};
use crate::metadata::EnvMetadata;
use crate::names::{validate_alias, validate_env_name};
use crate::venv::EnvironmentBuilder;
use fs_err as fs;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CreateRequest<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    /// Defaults to the environment name.
    pub alias: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub name: String,
    pub alias: String,
    pub path: PathBuf,
    pub python_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvListing {
    pub name: String,
    pub description: String,
    pub alias: Option<String>,
    /// What the alias runs, as written in the aliases file.
    pub activate: Option<String>,
    /// Whether the environment directory still exists.
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub name: String,
    pub alias_lines: usize,
    pub had_description: bool,
    pub purged: Option<PathBuf>,
}

/// Runs quickenv operations against explicit resources: the envs dir, the alias file and
/// the description store named by `config`, and the environment `builder`.
pub struct CommandProcessor<B> {
    config: QuickenvConfig,
    aliases: AliasFile,
    builder: B,
}

impl<B: EnvironmentBuilder> CommandProcessor<B> {
    pub fn new(config: QuickenvConfig, builder: B) -> Self {
        let aliases = AliasFile::new(config.aliases_file.clone(), config.shell);
        Self {
            config,
            aliases,
            builder,
        }
    }

    pub fn config(&self) -> &QuickenvConfig {
        &self.config
    }

    pub fn create(&self, req: CreateRequest<'_>) -> QuickenvResult<Created> {
        validate_env_name(req.name)?;
        self.check_not_reserved(req.name)?;
        let alias = req.alias.unwrap_or(req.name);
        validate_alias(alias)?;

        ensure_directory_exists(&self.config.envs_dir)?;
        let _lock = MutationLock::acquire(&self.config.envs_dir)?;

        let path = self.config.env_path(req.name);
        if path.exists() {
            return Err(QuickenvError::EnvironmentExists {
                name: req.name.to_string(),
                path,
            });
        }
        if self.aliases.is_taken(alias, req.name)? {
            return Err(QuickenvError::AliasInUse {
                alias: alias.to_string(),
                file: self.aliases.path().to_path_buf(),
            });
        }

        tracing::info!(name = req.name, path = %path.display(), "creating environment");
        let report = match self.builder.build(req.name, &path) {
            Ok(report) => report,
            Err(e) => {
                if path.exists() {
                    if let Err(cleanup) = fs::remove_dir_all(&path) {
                        tracing::warn!("could not remove partial environment: {cleanup}");
                    }
                }
                return Err(e);
            }
        };

        let meta = EnvMetadata::new(req.name, alias, report.python_version.clone());
        if let Err(e) = meta.save(&path) {
            tracing::warn!(name = req.name, "could not write environment metadata: {e}");
        }

        let command = self.config.activation_command(&path);
        self.aliases
            .upsert(req.name, alias, &command)
            .map_err(|e| QuickenvError::AliasRegistration {
                name: req.name.to_string(),
                path: path.clone(),
                source: Box::new(e),
            })?;

        self.write_description(req.name, req.description.unwrap_or(""))
            .map_err(|e| QuickenvError::DescriptionRegistration {
                name: req.name.to_string(),
                source: Box::new(e),
            })?;

        Ok(Created {
            name: req.name.to_string(),
            alias: alias.to_string(),
            path,
            python_version: report.python_version,
        })
    }

    /// Replace the description of a known environment. Names that are neither recorded in
    /// the store nor present in the envs dir are rejected rather than stored dangling.
    pub fn describe(&self, name: &str, description: &str) -> QuickenvResult<()> {
        validate_env_name(name)?;
        ensure_directory_exists(&self.config.envs_dir)?;
        let _lock = MutationLock::acquire(&self.config.envs_dir)?;

        let mut store = DescriptionStore::load(&self.config.descriptions_file)?;
        if store.get(name).is_none() && !self.config.env_path(name).is_dir() {
            return Err(QuickenvError::UnknownEnvironment {
                name: name.to_string(),
            });
        }
        store.set(name, description);
        store.save()?;
        tracing::info!(name, "updated description");
        Ok(())
    }

    /// Every recorded environment in name order; a missing description is `""`.
    pub fn list(&self) -> QuickenvResult<Vec<EnvListing>> {
        let store = DescriptionStore::load(&self.config.descriptions_file)?;
        let aliases: HashMap<String, AliasEntry> = self
            .aliases
            .entries()?
            .into_iter()
            .map(|e| (e.env.clone(), e))
            .collect();
        let mut out = Vec::with_capacity(store.len());
        for (name, description) in store.iter() {
            let path = self.config.env_path(name);
            let present = path.is_dir();
            let (alias, activate) = match aliases.get(name) {
                Some(entry) => (Some(entry.alias.clone()), Some(entry.command.clone())),
                None if present => (EnvMetadata::recorded_alias(&path)?, None),
                None => (None, None),
            };
            out.push(EnvListing {
                name: name.to_string(),
                description: description.to_string(),
                alias,
                activate,
                present,
            });
        }
        Ok(out)
    }

    /// Drop the alias line(s) and description of `name`. The environment directory is only
    /// deleted when `purge` is set.
    pub fn remove(&self, name: &str, purge: bool) -> QuickenvResult<Removed> {
        validate_env_name(name)?;
        ensure_directory_exists(&self.config.envs_dir)?;
        let _lock = MutationLock::acquire(&self.config.envs_dir)?;

        let path = self.config.env_path(name);
        let exists = path.is_dir();
        let alias = if exists {
            EnvMetadata::recorded_alias(&path)?
        } else {
            None
        };
        let legacy = legacy_line(alias.as_deref().unwrap_or(name), &path);

        let alias_lines = self.aliases.remove(name, Some(&legacy))?;

        let had_description = self.drop_description(name).map_err(|e| {
            if alias_lines == 0 {
                return e;
            }
            QuickenvError::DescriptionRemoval {
                name: name.to_string(),
                source: Box::new(e),
            }
        })?;

        if alias_lines == 0 && !had_description && !exists {
            return Err(QuickenvError::UnknownEnvironment {
                name: name.to_string(),
            });
        }

        let purged = if purge && exists {
            fs::remove_dir_all(&path).map_err(|e| QuickenvError::file_access(&path, e))?;
            tracing::info!(name, path = %path.display(), "deleted environment directory");
            Some(path)
        } else {
            None
        };

        Ok(Removed {
            name: name.to_string(),
            alias_lines,
            had_description,
            purged,
        })
    }

    // The default description store and the lock file share the envs dir with environments.
    fn check_not_reserved(&self, name: &str) -> QuickenvResult<()> {
        if name == LOCK_FILE_NAME || self.config.env_path(name) == self.config.descriptions_file {
            return Err(QuickenvError::InvalidName {
                kind: "environment name",
                value: name.to_string(),
                reason: "is reserved for quickenv's own files",
            });
        }
        Ok(())
    }

    fn drop_description(&self, name: &str) -> QuickenvResult<bool> {
        let mut store = DescriptionStore::load(&self.config.descriptions_file)?;
        let had_description = store.remove(name).is_some();
        if had_description {
            store.save()?;
        }
        Ok(had_description)
    }

    fn write_description(&self, name: &str, description: &str) -> QuickenvResult<()> {
        let mut store = DescriptionStore::load(&self.config.descriptions_file)?;
        store.set(name, description);
        store.save()
    }
}
