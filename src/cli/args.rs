//! Command-line argument definitions for the label tool
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::config::LabelConfig;
use crate::error::{LabelError, Result};
use crate::models::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the data bridges label tool
///
/// Resolves human-readable labels from questionnaire definitions and
/// applies them to coded survey datasets.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "databridges-labels",
    version,
    about = "Resolve questionnaire labels and apply them to coded survey data",
    long_about = "Reads questionnaire definitions as served by the data bridges API and resolves \
                  column labels and per-field choice labels. Labels can be printed as maps, JSON \
                  or tables, or applied to a CSV dataset to replace coded values."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the column-label dictionary of a questionnaire
    ColumnLabels(LabelArgs),
    /// Print the per-field choice labels of a questionnaire
    ValueLabels(LabelArgs),
    /// Print every choice list in long format
    Choices(ChoicesArgs),
    /// Replace coded values of a CSV dataset with their labels
    Map(MapArgs),
    /// Look up the admin-0 code of an ISO3 country code
    CountryCode(CountryCodeArgs),
}

/// Arguments shared by the label-resolving commands
#[derive(Debug, Clone, Parser)]
pub struct LabelArgs {
    /// Questionnaire definition (JSON)
    ///
    /// Either an array of field objects or an XLSForm definition response.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Output format: dict, json or df
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        default_value = "dict",
        help = "Output format (dict, json, df)"
    )]
    pub format: String,

    /// Indentation width of JSON output
    #[arg(long = "indent", value_name = "SPACES")]
    pub indent: Option<usize>,

    /// Write the result to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the choices command
#[derive(Debug, Clone, Parser)]
pub struct ChoicesArgs {
    /// Questionnaire definition (JSON)
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Write the table as CSV to a file instead of printing it
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the map command
#[derive(Debug, Clone, Parser)]
pub struct MapArgs {
    /// Coded survey dataset (CSV with header)
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Questionnaire definition (JSON)
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Labelled CSV destination; stdout when omitted
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Columns to coerce to integers after labelling (comma-separated)
    #[arg(
        long = "numeric",
        value_name = "LIST",
        value_delimiter = ',',
        help = "Comma-separated columns to coerce to integers"
    )]
    pub numeric: Vec<String>,

    /// Fill value for missing or non-numeric entries of --numeric columns
    #[arg(long = "sentinel", value_name = "VALUE", allow_negative_numbers = true)]
    pub sentinel: Option<i64>,
}

/// Arguments for the country-code command
#[derive(Debug, Clone, Parser)]
pub struct CountryCodeArgs {
    /// ISO 3166 alpha-3 code, any case
    #[arg(value_name = "ISO3")]
    pub iso3: String,

    /// Country reference table (JSON array)
    #[arg(long = "country-codes", value_name = "FILE")]
    pub country_codes: Option<PathBuf>,
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Validate global arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(LabelError::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }
}

impl LabelArgs {
    /// Parse the requested output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format.parse()
    }

    /// Overlay command flags onto the loaded configuration
    pub fn apply_to(&self, config: LabelConfig) -> LabelConfig {
        match self.indent {
            Some(indent) => config.with_json_indent(indent),
            None => config,
        }
    }
}

impl MapArgs {
    pub fn apply_to(&self, config: LabelConfig) -> LabelConfig {
        match self.sentinel {
            Some(sentinel) => config.with_sentinel(sentinel),
            None => config,
        }
    }
}

impl CountryCodeArgs {
    pub fn apply_to(&self, config: LabelConfig) -> LabelConfig {
        match &self.country_codes {
            Some(path) => config.with_country_codes_path(path),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_map_command() {
        let args = Args::try_parse_from([
            "databridges-labels",
            "map",
            "data.csv",
            "form.json",
            "--numeric",
            "HHSize,FCS",
            "--sentinel",
            "-1",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.get_log_level(), "debug");
        match args.command {
            Some(Commands::Map(map)) => {
                assert_eq!(map.numeric, vec!["HHSize", "FCS"]);
                assert_eq!(map.apply_to(LabelConfig::default()).sentinel, -1);
            }
            other => panic!("Expected map command, got {other:?}"),
        }
    }

    #[test]
    fn test_label_args_format() {
        let args = Args::try_parse_from([
            "databridges-labels",
            "value-labels",
            "form.json",
            "-f",
            "json",
        ])
        .unwrap();
        let Some(Commands::ValueLabels(labels)) = args.command else {
            panic!("Expected value-labels command");
        };
        assert_eq!(labels.output_format().unwrap(), OutputFormat::Json);
        assert_eq!(labels.apply_to(LabelConfig::default()).json_indent, 4);

        let bad = LabelArgs {
            format: "xml".to_string(),
            ..labels
        };
        assert!(matches!(
            bad.output_format().unwrap_err(),
            LabelError::UnknownFormat { .. }
        ));
    }

    #[test]
    fn test_log_level() {
        let quiet = Args::try_parse_from(["databridges-labels", "-q"]).unwrap();
        assert_eq!(quiet.get_log_level(), "error");

        let default = Args::try_parse_from(["databridges-labels"]).unwrap();
        assert_eq!(default.get_log_level(), "warn");
        assert!(default.command.is_none());
    }

    #[test]
    fn test_validate_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut args = Args::try_parse_from(["databridges-labels"]).unwrap();
        args.config_file = Some(config_path.clone());
        assert!(args.validate().is_err());

        std::fs::write(&config_path, "{}").unwrap();
        assert!(args.validate().is_ok());
    }
}
