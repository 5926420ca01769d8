// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional(cyfreeze.toml)
//!   .add_toml_file(--config)
//!   .with_env_prefix("CYFREEZE")      CYFREEZE_<SECTION>_<KEY>
//!   .set() / .set_parsed()            --set, CLI flags
//!        |
//!        v
//!    build() --> Config (resolved and validated)
//! ```
//!
//! Environment variables and overrides are applied in that order on top of
//! every file. Section names contain no underscore, so the first `_` after
//! the prefix separates section from key: `CYFREEZE_FREEZE_HIDDEN_IMPORTS`
//! sets `freeze.hidden_imports`. List keys take comma-separated values.

use anyhow::Context;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{ConfigError, Result};

/// Keys holding lists of strings.
const LIST_KEYS: &[&str] = &[
    "project.compile",
    "freeze.hidden_imports",
    "freeze.collect_all",
    "freeze.extra_args",
    "clean.dirs",
];

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    overrides: Vec<(String, config::Value)>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            overrides: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override. Later overrides win.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOverride` if the key has no `section.`
    /// part.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        validate_key(key)?;
        self.overrides.push((key.to_string(), value.into()));
        Ok(self)
    }

    /// Sets an override from its textual form, splitting list keys on commas.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOverride` if the key has no `section.`
    /// part.
    pub fn set_parsed(self, key: &str, raw: &str) -> Result<Self> {
        let value = override_value(key, raw);
        self.set(key, value)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - The merged configuration does not match the `Config` structure.
    /// - Validation fails (see `Config::resolve_and_validate`).
    pub fn build(self) -> Result<Config> {
        let mut builder = self.builder;

        if let Some(prefix) = &self.env_prefix {
            for (key, raw) in env_overrides(prefix, std::env::vars()) {
                let value = override_value(&key, &raw);
                builder = builder
                    .set_override(key.as_str(), value)
                    .with_context(|| format!("invalid environment override for '{key}'"))?;
            }
        }

        for (key, value) in self.overrides {
            builder = builder
                .set_override(key.as_str(), value)
                .with_context(|| format!("invalid override for '{key}'"))?;
        }

        let cfg = builder.build().context("failed to load configuration")?;
        let mut config: Config = cfg
            .try_deserialize()
            .context("configuration does not match the expected structure")?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[(String, PathBuf)] {
        &self.files
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_key(key: &str) -> std::result::Result<(), ConfigError> {
    match key.split_once('.') {
        Some((section, rest)) if !section.is_empty() && !rest.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidOverride(key.to_string())),
    }
}

/// Splits a `--set` argument into key and raw value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidOverride` when there is no `=` or the key is
/// not of the form `section.key`.
pub fn parse_override(spec: &str) -> std::result::Result<(String, String), ConfigError> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(spec.to_string()))?;
    let key = key.trim();
    validate_key(key).map_err(|_| ConfigError::InvalidOverride(spec.to_string()))?;
    Ok((key.to_string(), value.trim().to_string()))
}

/// Maps `PREFIX_SECTION_KEY=value` variables to `section.key` overrides.
pub(crate) fn env_overrides<I>(prefix: &str, vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let head = format!("{}_", prefix.to_uppercase());
    let mut overrides: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(name, value)| {
            let rest = name.strip_prefix(&head)?.to_lowercase();
            let (section, key) = rest.split_once('_')?;
            if section.is_empty() || key.is_empty() {
                return None;
            }
            Some((format!("{section}.{key}"), value))
        })
        .collect();
    overrides.sort();
    overrides
}

/// Converts a textual override to a config value.
pub(crate) fn override_value(key: &str, raw: &str) -> config::Value {
    if LIST_KEYS.contains(&key) {
        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        items.into()
    } else {
        raw.to_string().into()
    }
}
