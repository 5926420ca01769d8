// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for cyfreeze.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. cyfreeze.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. CYFREEZE_* env vars
//! 5. --set section.key=value
//! 6. dedicated CLI flags (--dry, --project, log levels)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! CYFREEZE_GLOBAL_DRY=true                  → global.dry = true
//! CYFREEZE_FREEZE_ONEFILE=false             → freeze.onefile = false
//! CYFREEZE_FREEZE_HIDDEN_IMPORTS=yaml,json  → freeze.hidden_imports = ["yaml", "json"]
//! ```
//!
//! # Example
//!
//! ```toml
//! [project]
//! entry = "main.py"
//! compile = ["bot.py", "captcha.py"]
//!
//! [freeze]
//! hidden_imports = ["requests", "yaml"]
//! ```

pub mod loader;
mod project;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use types::{
    CleanConfig, CythonConfig, DepsConfig, FreezeConfig, GlobalConfig, ProjectConfig,
    StashConfig, ToolsConfig,
};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "cyfreeze.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CYFREEZE";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub project: ProjectConfig,
    pub tools: ToolsConfig,
    pub deps: DepsConfig,
    pub cython: CythonConfig,
    pub freeze: FreezeConfig,
    pub stash: StashConfig,
    pub clean: CleanConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cyfreeze::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("cyfreeze.toml")
    ///     .with_env_prefix("CYFREEZE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display, one aligned `key = value`
    /// line per option, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_project_options(&mut options);
        self.format_tools_options(&mut options);
        self.format_deps_options(&mut options);
        self.format_cython_options(&mut options);
        self.format_freeze_options(&mut options);
        self.format_clean_options(&mut options);
        options.insert("stash.dir".into(), self.stash.dir.display().to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), fmt_opt(self.global.log_file.as_ref()));
    }

    fn format_project_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("project.root".into(), self.project.root.display().to_string());
        options.insert("project.entry".into(), self.project.entry.display().to_string());
        options.insert("project.name".into(), self.app_name());
        options.insert("project.compile".into(), fmt_list(&self.project.compile));
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.python".into(), fmt_opt(self.tools.python.as_ref()));
        options.insert(
            "tools.timeout_secs".into(),
            self.tools.timeout_secs.to_string(),
        );
    }

    fn format_deps_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "deps.auto_install".into(),
            self.deps.auto_install.to_string(),
        );
        for (package, module) in &self.deps.packages {
            options.insert(format!("deps.packages.{package}"), module.clone());
        }
        options.insert(
            "deps.requirements".into(),
            fmt_opt(self.deps.requirements.as_ref()),
        );
        options.insert(
            "deps.install_requirements".into(),
            self.deps.install_requirements.to_string(),
        );
    }

    fn format_cython_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("cython.builder".into(), self.cython.builder.to_string());
        options.insert(
            "cython.setup_script".into(),
            self.cython.setup_script.display().to_string(),
        );
        options.insert(
            "cython.language_level".into(),
            self.cython.language_level.clone(),
        );
        for (key, value) in &self.cython.directives {
            options.insert(format!("cython.directives.{key}"), value.clone());
        }
        options.insert(
            "cython.jobs".into(),
            self.cython.jobs.map_or_else(String::new, |j| j.to_string()),
        );
    }

    fn format_freeze_options(&self, options: &mut BTreeMap<String, String>) {
        let freeze = &self.freeze;
        options.insert("freeze.onefile".into(), freeze.onefile.to_string());
        options.insert("freeze.console".into(), freeze.console.to_string());
        options.insert("freeze.clean_cache".into(), freeze.clean_cache.to_string());
        options.insert("freeze.icon".into(), fmt_opt(freeze.icon.as_ref()));
        options.insert(
            "freeze.hidden_imports".into(),
            freeze.hidden_imports.join(", "),
        );
        options.insert(
            "freeze.auto_hidden_imports".into(),
            freeze.auto_hidden_imports.to_string(),
        );
        options.insert("freeze.collect_all".into(), freeze.collect_all.join(", "));
        options.insert(
            "freeze.data".into(),
            freeze
                .data
                .iter()
                .map(|m| format!("{} -> {}", m.source.display(), m.dest))
                .collect::<Vec<_>>()
                .join(", "),
        );
        options.insert("freeze.extra_args".into(), freeze.extra_args.join(" "));
        options.insert("freeze.dist_dir".into(), freeze.dist_dir.display().to_string());
        options.insert("freeze.work_dir".into(), freeze.work_dir.display().to_string());
        options.insert("freeze.spec_dir".into(), freeze.spec_dir.display().to_string());
    }

    fn format_clean_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("clean.dirs".into(), fmt_list(&self.clean.dirs));
        options.insert("clean.remove_spec".into(), self.clean.remove_spec.to_string());
        options.insert(
            "clean.intermediates".into(),
            self.clean.intermediates.to_string(),
        );
        options.insert("clean.pycache".into(), self.clean.pycache.to_string());
    }
}

fn fmt_opt(path: Option<&PathBuf>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}

fn fmt_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
