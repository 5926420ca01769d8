// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Build | Clean | Restore | Deps | Imports | Options | Inis
//! ```

use std::process::ExitCode;

use cyfreeze::cli::global::GlobalOptions;
use cyfreeze::cli::{self, Command};
use cyfreeze::cmd::build::run_build_command;
use cyfreeze::cmd::clean::run_clean_command;
use cyfreeze::cmd::config::{run_inis_command, run_options_command};
use cyfreeze::cmd::deps::run_deps_command;
use cyfreeze::cmd::imports::run_imports_command;
use cyfreeze::cmd::restore::run_restore_command;
use cyfreeze::config::loader::{ConfigLoader, parse_override};
use cyfreeze::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use cyfreeze::logging::init_logging;
use cyfreeze::logging::{LogConfig, LogLevel};

use anyhow::Context;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Commands that read the project load it before logging starts, so the
    // levels in [global] apply to their whole run.
    let config = if needs_config(cli.command.as_ref()) {
        match load_config(&cli.global) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Error: {e:#}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let log_config = config
        .as_ref()
        .map_or_else(|| build_log_config(&cli.global), |c| c.global.log_config());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config.as_ref()).await
}

const fn needs_config(command: Option<&Command>) -> bool {
    !matches!(command, None | Some(Command::Version | Command::Inis))
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Option<&Config>) -> ExitCode {
    let result = match (&cli.command, config) {
        (Some(Command::Version), _) => {
            handle_version_command();
            Ok(())
        }
        (Some(Command::Inis), _) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        (Some(Command::Options), Some(config)) => {
            run_options_command(config);
            Ok(())
        }
        (Some(Command::Build(args)), Some(config)) => {
            run_build_command(args, config, config.global.dry).await
        }
        (Some(Command::Clean(args)), Some(config)) => {
            run_clean_command(args, config, config.global.dry)
        }
        (Some(Command::Restore), Some(config)) => run_restore_command(config, config.global.dry),
        (Some(Command::Deps(args)), Some(config)) => {
            run_deps_command(args, config, config.global.dry).await
        }
        (Some(Command::Imports), Some(config)) => run_imports_command(config),
        (Some(_), None) => Err(anyhow::anyhow!("configuration was not loaded")),
        (None, _) => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    if let Some(path) = global.project_config_file() {
        loader = loader.add_toml_file_optional(path);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> cyfreeze::error::Result<Config> {
    let mut loader = build_config_loader(global);
    for spec in global.to_config_overrides() {
        let (key, value) = parse_override(&spec)?;
        loader = loader.set_parsed(&key, &value)?;
    }
    loader.build().context("failed to load config")
}
