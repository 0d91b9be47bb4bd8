//! CLI argument definitions for rowcast.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use rowcast_core::MachineWidth;

#[derive(Parser)]
#[command(
    name = "rowcast",
    version,
    about = "Coerce JSON Lines through typed record templates",
    long_about = "Coerce JSON Lines through typed record templates.\n\n\
                  Each input line is a JSON array (bound to fields by position) or\n\
                  object (bound by name). Every line is converted to one JSON object\n\
                  in template order, with hidden fields removed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert JSON Lines through a template.
    Convert(ConvertArgs),

    /// Print the resolved template.
    Describe(TemplateArgs),
}

/// Where the template comes from.
#[derive(Args)]
pub struct TemplateArgs {
    /// Field declarations as `name:type`, or a bare `name` for an auto field.
    ///
    /// Fields given here are declared after the ones from `--definitions`;
    /// redeclaring a name changes its type but keeps its position.
    #[arg(value_name = "FIELD")]
    pub fields: Vec<String>,

    /// YAML or JSON column definition file.
    #[arg(long = "definitions", value_name = "PATH", env = "ROWCAST_DEFINITIONS")]
    pub definitions: Option<PathBuf>,

    /// Reject definition entries with an unknown type instead of dropping them.
    #[arg(long = "strict-definitions")]
    pub strict_definitions: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Input file (default: stdin).
    #[arg(long = "input", short = 'i', value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Drop lines that fail to convert instead of stopping at the first one.
    #[arg(long = "skip-errors")]
    pub skip_errors: bool,

    /// Bit width of the machine-sized `int` and `uint` types.
    #[arg(long = "int-width", value_name = "BITS", default_value = "64")]
    pub int_width: MachineWidth,

    /// strftime format for time values (default: RFC 3339).
    #[arg(long = "datetime-format", value_name = "FMT")]
    pub datetime_format: Option<String>,

    /// strftime format for date values.
    #[arg(long = "date-format", value_name = "FMT", default_value = "%Y-%m-%d")]
    pub date_format: String,

    /// Include record values in logs and error messages.
    ///
    /// Values are replaced with `[REDACTED]` by default.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
