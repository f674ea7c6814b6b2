//! subhub command-line interface.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use subhub_cli::config::{AppConfig, ConfigOverrides};
use subhub_cli::logging::{LogConfig, LogFormat, init_logging};
use subhub_cli::summary::{print_error, print_output};
use subhub_cli::types::CommandOutput;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_create_batch, run_drafts, run_fetch, run_flatten, run_normalize};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            print_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(ConfigOverrides {
        webhook_url: cli.webhook_url.clone(),
        drafts_path: cli.drafts.clone(),
    });
    let output: CommandOutput = match &cli.command {
        Command::Normalize(args) => run_normalize(args)?,
        Command::Flatten(args) => run_flatten(args)?,
        Command::Fetch(args) => run_fetch(args, &config)?,
        Command::CreateBatch(args) => run_create_batch(args, &config, !cli.json)?,
        Command::Drafts(command) => run_drafts(command, &config)?,
    };
    print_output(&output, cli.json)?;
    Ok(output.exit_code())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
