//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use crewroster_core::{RoleCode, TracingConfig, TracingOutputFormat};

/// crewroster - Airline crew roster at a glance
#[derive(Debug, Parser)]
#[command(name = "crewroster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CREWROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to a JSON roster dump (overrides the configured source)
    #[arg(long, short, env = "CREWROSTER_ROSTER")]
    pub roster: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Log filter directive (e.g. crewroster_calendar=trace), overrides RUST_LOG
    #[arg(long, env = "CREWROSTER_LOG")]
    pub log_filter: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Builds the tracing configuration from the flags and the config file.
    pub fn tracing_config(&self, config_debug: bool) -> TracingConfig {
        let config = TracingConfig::cli(self.debug || config_debug)
            .with_format(self.log_format.into());
        match self.log_filter {
            Some(ref filter) => config.with_env_filter(filter),
            None => config,
        }
    }
}

/// Log line formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => TracingOutputFormat::Pretty,
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List roster events between two dates
    Events {
        /// First day (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (defaults to the configured lookahead)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show the next roster event
    Next,

    /// Export the roster as an iCalendar document
    Export {
        /// First day (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (defaults to the configured lookahead)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Save to `<export_dir>/<user_id>_roster.ics` instead of printing
        #[arg(long)]
        save: bool,
    },

    /// List scheduled flights still missing crew
    Unstaffed {
        /// First day (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (defaults to the first day only)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only this aircraft type (e.g. 320)
        #[arg(long)]
        aircraft_type: Option<String>,

        /// Only flights missing this role (e.g. CDB, CC)
        #[arg(long)]
        role: Option<RoleCode>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
