// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::fs;
use std::path::{Path, PathBuf};

use cyfreeze::cli::global::GlobalOptions;
use cyfreeze::config::Config;
use cyfreeze::config::loader::parse_override;
use cyfreeze::config::types::CythonBuilder;

// =============================================================================
// Sample configuration
// =============================================================================

#[test]
fn config_sample_file_parses() {
    let sample = Path::new(env!("CARGO_MANIFEST_DIR")).join("cyfreeze.sample.toml");
    let config = Config::from_file(&sample).unwrap();

    assert_eq!(
        config.compile_modules(),
        [PathBuf::from("bot.py"), PathBuf::from("captcha.py")]
    );
    assert!(config.freeze.onefile);
    assert!(
        config
            .freeze
            .hidden_imports
            .iter()
            .any(|m| m == "undetected_chromedriver")
    );
    assert_eq!(config.app_name(), "main");
    assert_eq!(config.cython.builder, CythonBuilder::Auto);
}

// =============================================================================
// Builder Pattern
// =============================================================================

#[test]
fn config_builder_layered_files() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().display().to_string().replace('\\', "/");
    let base = temp.path().join("base.toml");
    let local = temp.path().join("local.toml");
    fs::write(
        &base,
        format!(
            "[project]\nroot = \"{root}\"\ncompile = [\"bot.py\"]\n\n[freeze]\nonefile = true\nhidden_imports = [\"yaml\"]\n"
        ),
    )
    .unwrap();
    fs::write(&local, "[freeze]\nonefile = false\n").unwrap();

    let loader = Config::builder()
        .add_toml_file(&base)
        .add_toml_file_optional(&local)
        .add_toml_file_optional(temp.path().join("absent.toml"));
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert!(!config.freeze.onefile);
    assert_eq!(config.freeze.hidden_imports, ["yaml"]);
    assert_eq!(config.project_root(), temp.path());
    assert_eq!(config.freeze.dist_dir, temp.path().join("dist"));
    assert_eq!(config.stash_dir(), temp.path().join(".cyfreeze-stash"));
}

#[test]
fn config_project_dir_file_layers_over_local() {
    let temp = tempfile::tempdir().unwrap();
    let project = temp.path().join("bot");
    fs::create_dir_all(&project).unwrap();
    let local = temp.path().join("cyfreeze.toml");
    fs::write(&local, "[project]\ncompile = [\"bot.py\"]\n\n[freeze]\nonefile = false\n").unwrap();
    fs::write(
        project.join("cyfreeze.toml"),
        "[project]\ncompile = [\"bot.py\", \"captcha.py\"]\n",
    )
    .unwrap();

    let global = GlobalOptions {
        project: Some(project.clone()),
        ..GlobalOptions::default()
    };
    let mut loader = Config::builder().add_toml_file_optional(&local);
    if let Some(path) = global.project_config_file() {
        loader = loader.add_toml_file_optional(path);
    }
    for spec in global.to_config_overrides() {
        let (key, value) = parse_override(&spec).unwrap();
        loader = loader.set_parsed(&key, &value).unwrap();
    }
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.project_root(), project);
    assert!(!config.freeze.onefile);
    assert_eq!(
        config.compile_modules(),
        [PathBuf::from("bot.py"), PathBuf::from("captcha.py")]
    );
}

#[test]
fn config_builder_parsed_overrides() {
    let config = Config::builder()
        .add_toml_str("[project]\nroot = \"/srv/bot\"\ncompile = [\"bot.py\"]\n")
        .set_parsed("project.compile", "bot.py, captcha.py")
        .unwrap()
        .set_parsed("freeze.onefile", "false")
        .unwrap()
        .set_parsed("global.dry", "true")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        config.compile_modules(),
        [PathBuf::from("bot.py"), PathBuf::from("captcha.py")]
    );
    assert!(!config.freeze.onefile);
    assert!(config.global.dry);
}

#[test]
fn config_entry_cannot_be_compiled() {
    let err = Config::parse("[project]\nentry = \"main.py\"\ncompile = [\"main.py\"]\n").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'compile' in section '[project]': 'main.py' is the entry script, which must stay a source file"
    );
}

#[test]
fn config_format_options_lists_every_section() {
    let config = Config::parse("[project]\nroot = \"/srv/bot\"\n").unwrap();
    let options = config.format_options();
    for prefix in ["global.", "project.", "tools.", "deps.", "cython.", "freeze.", "stash.", "clean."] {
        assert!(
            options.iter().any(|line| line.starts_with(prefix)),
            "missing {prefix} options"
        );
    }
}
