//! Command implementations for the label tool CLI
//!
//! This module contains the command execution logic: logging setup,
//! configuration loading, file input/output and result printing.

use crate::cli::args::{Args, ChoicesArgs, Commands, CountryCodeArgs, LabelArgs, MapArgs};
use crate::config::LabelConfig;
use crate::country::CountryContext;
use crate::definition::{choice_list_table, definition_from_json};
use crate::error::LabelError;
use crate::labels::{LabelResolver, to_indented_json};
use crate::models::{ChoiceLabels, ColumnLabels, LabelOutput};
use anyhow::{Context, Result};
use colored::*;
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Main command runner
///
/// Sets up logging, loads the configuration and dispatches to the
/// requested subcommand.
pub async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args).await?;

    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Commands::ColumnLabels(label_args) => run_column_labels(&label_args, &config).await?,
        Commands::ValueLabels(label_args) => run_value_labels(&label_args, &config).await?,
        Commands::Choices(choices_args) => run_choices(&choices_args).await?,
        Commands::Map(map_args) => run_map(&map_args, &config).await?,
        Commands::CountryCode(country_args) => run_country_code(&country_args, &config)?,
    }

    info!("Finished in {:.2?}", start_time.elapsed());
    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("databridges_labels={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the configuration file if one was given, defaults otherwise
async fn load_configuration(args: &Args) -> Result<LabelConfig> {
    let config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            LabelConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => LabelConfig::default(),
    };
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Read a questionnaire definition from a JSON file
pub async fn load_definition(path: &Path) -> Result<DataFrame> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read definition {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Definition {} is not valid JSON", path.display()))?;
    let definition = definition_from_json(&payload)
        .with_context(|| format!("Failed to load definition {}", path.display()))?;

    info!(
        "Loaded definition {} with {} fields",
        path.display(),
        definition.height()
    );
    Ok(definition)
}

/// Read a CSV dataset with a header row
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    info!(
        "Loaded dataset {}: {} rows, {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a frame as CSV to a file, or to stdout when no path is given
pub fn write_dataset(df: &mut DataFrame, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
            info!("Wrote {} rows to {}", df.height(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            CsvWriter::new(stdout.lock()).include_header(true).finish(df)?;
        }
    }
    Ok(())
}

async fn run_column_labels(args: &LabelArgs, config: &LabelConfig) -> Result<()> {
    let format = args.output_format()?;
    let config = args.apply_to(config.clone());
    let definition = load_definition(&args.definition).await?;

    let resolver = LabelResolver::new().with_config(config);
    let output = resolver.column_labels(&definition, format)?;
    emit_column_labels(output, args.output.as_deref(), resolver.config().json_indent)
}

async fn run_value_labels(args: &LabelArgs, config: &LabelConfig) -> Result<()> {
    let format = args.output_format()?;
    let config = args.apply_to(config.clone());
    let definition = load_definition(&args.definition).await?;

    let resolver = LabelResolver::new().with_config(config);
    let output = resolver.choice_labels(&definition, format)?;
    emit_choice_labels(output, args.output.as_deref(), resolver.config().json_indent)
}

async fn run_choices(args: &ChoicesArgs) -> Result<()> {
    let definition = load_definition(&args.definition).await?;
    let mut table = choice_list_table(&definition)?;

    match &args.output {
        Some(path) => write_dataset(&mut table, Some(path)),
        None => {
            println!("{table}");
            Ok(())
        }
    }
}

/// Label a dataset and optionally coerce columns to integers
pub async fn run_map(args: &MapArgs, config: &LabelConfig) -> Result<()> {
    let config = args.apply_to(config.clone());
    let definition = load_definition(&args.definition).await?;
    let dataset = read_dataset(&args.dataset)?;

    let resolver = LabelResolver::new().with_config(config);
    let labelled = resolver.map_value_labels(&dataset, &definition)?;
    let mut labelled = if args.numeric.is_empty() {
        labelled
    } else {
        resolver.coerce_numeric(&labelled, &args.numeric)?
    };

    write_dataset(&mut labelled, args.output.as_deref())
}

fn run_country_code(args: &CountryCodeArgs, config: &LabelConfig) -> Result<()> {
    let config = args.apply_to(config.clone());
    let path = config.country_codes_path.ok_or_else(|| {
        LabelError::configuration("no country reference table given; pass --country-codes")
    })?;

    let context = CountryContext::new(path);
    match context.adm0_code(&args.iso3)? {
        Some(code) => println!(
            "{} {}",
            args.iso3.to_uppercase().bright_white().bold(),
            code.to_string().bright_green()
        ),
        None => println!(
            "{} {}",
            args.iso3.to_uppercase().bright_white().bold(),
            "not found".yellow()
        ),
    }
    Ok(())
}

fn emit_column_labels(
    output: LabelOutput<ColumnLabels>,
    destination: Option<&Path>,
    indent: usize,
) -> Result<()> {
    match output {
        LabelOutput::Map(labels) => match destination {
            Some(path) => write_text(path, &to_indented_json(&labels, indent)?),
            None => {
                for (name, label) in &labels {
                    println!("{} {}", name.bright_white().bold(), label);
                }
                Ok(())
            }
        },
        LabelOutput::Json(text) => emit_text(&text, destination),
        LabelOutput::Frame(mut df) => emit_frame(&mut df, destination),
    }
}

fn emit_choice_labels(
    output: LabelOutput<ChoiceLabels>,
    destination: Option<&Path>,
    indent: usize,
) -> Result<()> {
    match output {
        LabelOutput::Map(labels) => match destination {
            Some(path) => write_text(path, &to_indented_json(&labels, indent)?),
            None => {
                for (name, choices) in &labels {
                    println!("{}", name.bright_white().bold());
                    for (code, label) in choices {
                        println!("    {} {}", code.cyan(), label);
                    }
                }
                Ok(())
            }
        },
        LabelOutput::Json(text) => emit_text(&text, destination),
        LabelOutput::Frame(mut df) => emit_frame(&mut df, destination),
    }
}

fn emit_text(text: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => write_text(path, text),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Tables go to files as CSV; nested columns are printed only
fn emit_frame(df: &mut DataFrame, destination: Option<&Path>) -> Result<()> {
    let nested = df
        .get_columns()
        .iter()
        .any(|column| matches!(column.dtype(), DataType::List(_) | DataType::Struct(_)));

    match destination {
        Some(path) if !nested => write_dataset(df, Some(path)),
        Some(path) => Err(LabelError::configuration(format!(
            "nested table cannot be written as CSV to {}; use --format json",
            path.display()
        ))
        .into()),
        None => {
            println!("{df}");
            Ok(())
        }
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"[
        {"name": "RESPSex", "label": "Sex of respondent",
         "choiceList": {"name": "sex", "choices": [
             {"name": "0", "label": "Female"},
             {"name": "1", "label": "Male"}
         ]}},
        {"name": "HHSize", "label": "Household size", "choiceList": null}
    ]"#;

    fn write_inputs(temp_dir: &TempDir, csv: &str) -> (PathBuf, PathBuf) {
        let dataset = temp_dir.path().join("survey.csv");
        let definition = temp_dir.path().join("form.json");
        std::fs::write(&dataset, csv).unwrap();
        std::fs::write(&definition, DEFINITION).unwrap();
        (dataset, definition)
    }

    fn map_args(dataset: PathBuf, definition: PathBuf, output: PathBuf) -> MapArgs {
        MapArgs {
            dataset,
            definition,
            output: Some(output),
            numeric: Vec::new(),
            sentinel: None,
        }
    }

    #[tokio::test]
    async fn test_load_definition() {
        let temp_dir = TempDir::new().unwrap();
        let (_, definition) = write_inputs(&temp_dir, "RESPSex\n1\n");

        let df = load_definition(&definition).await.unwrap();
        assert_eq!(df.height(), 2);
    }

    #[tokio::test]
    async fn test_load_definition_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_definition(&temp_dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }

    #[tokio::test]
    async fn test_run_map_writes_labelled_csv() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset, definition) = write_inputs(&temp_dir, "RESPSex,HHSize\n1,4\n0,2\n");
        let output = temp_dir.path().join("labelled.csv");

        run_map(&map_args(dataset, definition, output.clone()), &LabelConfig::default())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "RESPSex,HHSize\nMale,4\nFemale,2\n");
    }

    #[tokio::test]
    async fn test_run_map_with_numeric_columns() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset, definition) = write_inputs(&temp_dir, "RESPSex,HHSize\n1,4\n0,\n");
        let output = temp_dir.path().join("labelled.csv");

        let mut args = map_args(dataset, definition, output.clone());
        args.numeric = vec!["HHSize".to_string()];
        args.sentinel = Some(-1);
        run_map(&args, &LabelConfig::default()).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "RESPSex,HHSize\nMale,4\nFemale,-1\n");
    }

    #[tokio::test]
    async fn test_run_map_unknown_numeric_column() {
        let temp_dir = TempDir::new().unwrap();
        let (dataset, definition) = write_inputs(&temp_dir, "RESPSex\n1\n");

        let mut args = map_args(dataset, definition, temp_dir.path().join("out.csv"));
        args.numeric = vec!["FCS".to_string()];
        let err = run_map(&args, &LabelConfig::default()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LabelError>(),
            Some(LabelError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_emit_frame_rejects_nested_csv() {
        let temp_dir = TempDir::new().unwrap();
        let inner = Series::new("inner".into(), [1i64, 2]);
        let mut df = DataFrame::new(vec![
            Series::new("nested".into(), [inner.clone(), inner]).into_column(),
        ])
        .unwrap();

        assert!(emit_frame(&mut df, Some(&temp_dir.path().join("out.csv"))).is_err());
    }
}
