//! rowcast command line.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use rowcast_cli::commands::{
    ConvertOptions, TemplateSource, render_error, run_convert_paths, run_describe,
};
use rowcast_cli::logging::{LogConfig, LogFormat, init_logging};
use rowcast_core::CoerceOptions;

mod cli;

use crate::cli::{Cli, Command, ConvertArgs, LogFormatArg, LogLevelArg, TemplateArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Convert(args) => {
            let options = convert_options(&args);
            run_convert_paths(&options, args.input.as_deref(), args.output.as_deref()).map(|_| ())
        }
        Command::Describe(args) => run_describe(&template_source(&args)),
    };
    if let Err(error) = result {
        eprintln!("error: {}", render_error(&error));
        std::process::exit(1);
    }
}

fn template_source(args: &TemplateArgs) -> TemplateSource {
    TemplateSource {
        fields: args.fields.clone(),
        definitions: args.definitions.clone(),
        strict_definitions: args.strict_definitions,
    }
}

fn convert_options(args: &ConvertArgs) -> ConvertOptions {
    ConvertOptions {
        template: template_source(&args.template),
        coerce: CoerceOptions::new()
            .with_machine_width(args.int_width)
            .with_datetime_format(args.datetime_format.clone())
            .with_date_format(args.date_format.clone()),
        skip_errors: args.skip_errors,
        log_data: args.log_data,
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
