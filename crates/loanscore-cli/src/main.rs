//! `loanscore` command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use loanscore_cli::logging::{LogConfig, LogFormat, init_logging};
use loanscore_client::ClientError;
use loanscore_core::CoreError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_annotate, run_batch, run_contacts, run_credit_score, run_encode, run_evaluate,
    run_fields, run_health, run_login, run_logout, run_register, run_score, run_whoami,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match dispatch(&cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::debug!(error = ?error, "command failed");
            eprintln!("error: {}", describe_error(&error));
            1
        }
    };
    std::process::exit(exit_code);
}

fn dispatch(cli: &Cli) -> anyhow::Result<i32> {
    let service = &cli.service;
    match &cli.command {
        Command::Fields => run_fields(service).map(|()| 0),
        Command::Encode(args) => run_encode(service, args).map(|()| 0),
        Command::Score(args) => run_score(service, args).map(|()| 0),
        Command::Batch(args) => run_batch(service, args),
        Command::Evaluate(args) => run_evaluate(service, args).map(|()| 0),
        Command::Login(args) => run_login(service, args).map(|()| 0),
        Command::Register(args) => run_register(service, args).map(|()| 0),
        Command::Logout => run_logout(service).map(|()| 0),
        Command::Whoami => run_whoami(service).map(|()| 0),
        Command::Health => run_health(service),
        Command::CreditScore(args) => run_credit_score(args).map(|()| 0),
        Command::Annotate(args) => run_annotate(args).map(|()| 0),
        Command::Contacts(args) => run_contacts(args).map(|()| 0),
    }
}

/// Prefer the service client's friendly message when one is in the chain.
fn describe_error(error: &anyhow::Error) -> String {
    for cause in error.chain() {
        if let Some(client) = cause.downcast_ref::<ClientError>() {
            return client.user_message();
        }
        if let Some(CoreError::Client(client)) = cause.downcast_ref::<CoreError>() {
            return client.user_message();
        }
    }
    format!("{error:#}")
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
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
