//! CLI argument definitions for the SNOMED disease search.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "snomed-search",
    version,
    about = "SNOMED disease search - Resolve patient medical codes to disease labels",
    long_about = "Resolve a patient's recorded medical codes to SNOMED CT concepts\n\
                  and match them against an external disease codelist.\n\n\
                  Inputs are a multi-sheet patient-data workbook (Patient,\n\
                  Observation, Medical dictionary) and a codelist CSV, both named\n\
                  in <CONFIG_DIR>/search.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Directory containing search.toml.
    #[arg(
        long = "config-dir",
        value_name = "DIR",
        default_value = "configs",
        global = true
    )]
    pub config_dir: PathBuf,

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

    /// Allow patient identifiers in log output (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a patient's matched disease labels.
    Search(PatientArgs),

    /// List the codelist's concept codes for a disease.
    Codes(CodesArgs),

    /// Evaluate the built-in disease rules against a patient's record.
    Screen(PatientArgs),
}

#[derive(Parser)]
pub struct PatientArgs {
    /// Patient whose record to evaluate (overrides the configured default).
    #[arg(long = "patient-id", value_name = "ID")]
    pub patient_id: Option<String>,
}

#[derive(Parser)]
pub struct CodesArgs {
    /// Disease label as it appears in the codelist.
    #[arg(value_name = "DISEASE")]
    pub disease: String,
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
