//! `flux`: summary notebooks for neuroimaging datasets.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use flux_cli::commands::{run_book, run_generate};
use flux_cli::config::{BookSettings, GenerateSettings};
use flux_cli::logging::{LogConfig, LogFormat, init_logging};
use flux_core::builtin_registry;
use flux_model::PipelineOptions;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{BookArgs, Cli, Command, GenerateArgs, LogFormatArg, LogLevelArg};
use crate::summary::{print_book_summary, print_generate_summary, print_sections};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Book(args) => book(args),
        Command::Sections => {
            print_sections(builtin_registry());
            0
        }
    };
    std::process::exit(exit_code);
}

fn generate(args: GenerateArgs) -> i32 {
    let settings = GenerateSettings {
        dataset: args.dataset,
        outdir: args.outdir,
        template: args.template.map(Into::into),
        sections: args.sections,
    };
    let options = PipelineOptions::default().with_kernel(args.kernel);
    match run_generate(&settings, options) {
        Ok(run) => {
            print_generate_summary(&run);
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

fn book(args: BookArgs) -> i32 {
    let settings = BookSettings::resolve(args.superdataset, args.book, args.out, args.title);
    let options = PipelineOptions::default().with_kernel(args.kernel);
    match run_book(&settings, options) {
        Ok(run) => {
            print_book_summary(&run);
            if run.any_built() { 0 } else { 1 }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
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
