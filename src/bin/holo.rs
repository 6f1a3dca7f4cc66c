//! holo - microbiome sample metadata summaries
//!
//! Command-line front end over the filter and aggregation core.

use clap::{Args, Parser, Subcommand, ValueEnum};
use holobiome::aggregate::{completeness_by_study, SummaryMetrics};
use holobiome::config::DashboardConfig;
use holobiome::data::{Dataset, DatasetHandle};
use holobiome::error::{HoloError, Result};
use holobiome::filter::{filter, filter_options};
use holobiome::labels::StudyLabels;
use holobiome::overview::{dashboard_predicates, study_counts, Overview};
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable text or TSV
    Text,
    Json,
    Yaml,
}

/// Microbiome sample metadata summaries
#[derive(Parser)]
#[command(name = "holo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dashboard configuration YAML
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Metadata TSV (overrides the configured path)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Disease and study selections; "All" disables a filter
#[derive(Args, Debug)]
struct FilterArgs {
    /// Disease status to keep
    #[arg(long, default_value = "All")]
    disease: String,

    /// Study to keep
    #[arg(long, default_value = "All")]
    study: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline metrics
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print samples per study, largest first
    Counts {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print per-study completeness of clinical fields (ignores filters)
    Completeness {
        /// Fields to check (comma-separated); defaults to the configured fields
        #[arg(long)]
        fields: Option<String>,

        /// Output format for stdout
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Write the table to this TSV instead of stdout (text format only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the filtered samples as TSV
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output path for the filtered TSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the values a filter field can take
    Options {
        /// Field to list (e.g., "disease_status")
        field: String,
    },

    /// Print the full overview for the presentation layer
    Overview {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format: json or yaml
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },

    /// Generate an example dashboard configuration
    ExampleConfig {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "dashboard.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            DashboardConfig::from_file(path)?
        }
        None => DashboardConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data = data;
    }

    match cli.command {
        Commands::ExampleConfig { output } => cmd_example_config(&output),
        Commands::Summary { filters } => {
            let dataset = load(&config)?;
            cmd_summary(&dataset, &config, &filters)
        }
        Commands::Counts { filters, format } => {
            let dataset = load(&config)?;
            let labels = load_labels(&config)?;
            cmd_counts(&dataset, &config, &labels, &filters, format)
        }
        Commands::Completeness {
            fields,
            format,
            output,
        } => {
            let dataset = load(&config)?;
            let fields = match fields {
                Some(list) => parse_list(&list),
                None => config.tracked_fields.clone(),
            };
            cmd_completeness(&dataset, &fields, format, output.as_deref())
        }
        Commands::Filter { filters, output } => {
            let dataset = load(&config)?;
            cmd_filter(&dataset, &config, &filters, &output)
        }
        Commands::Options { field } => {
            let dataset = load(&config)?;
            for option in filter_options(&dataset, &field) {
                println!("{}", option);
            }
            Ok(())
        }
        Commands::Overview { filters, format } => {
            let dataset = load(&config)?;
            let labels = load_labels(&config)?;
            cmd_overview(&dataset, &config, &labels, &filters, format)
        }
    }
}

fn load(config: &DashboardConfig) -> Result<Arc<Dataset>> {
    let mut handle = DatasetHandle::new(&config.data, config.load_options());
    handle.dataset()
}

fn load_labels(config: &DashboardConfig) -> Result<StudyLabels> {
    match &config.study_labels {
        Some(path) => {
            let labels = StudyLabels::from_tsv(path)?;
            debug!("Loaded {} study labels", labels.len());
            Ok(labels)
        }
        None => Ok(StudyLabels::new()),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}

fn filtered(dataset: &Dataset, config: &DashboardConfig, filters: &FilterArgs) -> Dataset {
    let predicates = dashboard_predicates(config, &filters.disease, &filters.study);
    filter(dataset, &predicates)
}

fn cmd_summary(dataset: &Dataset, config: &DashboardConfig, filters: &FilterArgs) -> Result<()> {
    let view = filtered(dataset, config, filters);
    let metrics = SummaryMetrics::compute(&view, &config.age_field, &config.bmi_field);
    print!("{}", metrics);
    Ok(())
}

fn cmd_counts(
    dataset: &Dataset,
    config: &DashboardConfig,
    labels: &StudyLabels,
    filters: &FilterArgs,
    format: Format,
) -> Result<()> {
    let view = filtered(dataset, config, filters);
    let counts = study_counts(&view, labels);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(&counts)?),
        Format::Text => {
            println!("study_id\tlabel\tsamples");
            for c in &counts {
                println!("{}\t{}\t{}", c.study_id, labels.label_for(&c.study_id), c.samples);
            }
        }
    }
    Ok(())
}

fn cmd_completeness(
    dataset: &Dataset,
    fields: &[String],
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    check_completeness_output(format, output)?;
    let table = completeness_by_study(dataset, fields);

    if let Some(path) = output {
        table.to_tsv(path)?;
        info!(
            "Wrote completeness of {} fields for {} studies to {}",
            fields.len(),
            table.n_studies(),
            path.display()
        );
        return Ok(());
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&table.as_map())?),
        Format::Yaml => print!("{}", serde_yaml::to_string(&table)?),
        Format::Text => table.write_tsv(io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_filter(
    dataset: &Dataset,
    config: &DashboardConfig,
    filters: &FilterArgs,
    output: &PathBuf,
) -> Result<()> {
    let view = filtered(dataset, config, filters);
    view.to_tsv_with_options(output, &config.load_options())?;
    info!(
        "Wrote {} of {} samples to {}",
        view.len(),
        dataset.len(),
        output.display()
    );
    Ok(())
}

fn cmd_overview(
    dataset: &Dataset,
    config: &DashboardConfig,
    labels: &StudyLabels,
    filters: &FilterArgs,
    format: Format,
) -> Result<()> {
    check_overview_format(format)?;
    let predicates = dashboard_predicates(config, &filters.disease, &filters.study);
    let overview = Overview::compute(dataset, &predicates, config, labels);

    match format {
        Format::Yaml => print!("{}", serde_yaml::to_string(&overview)?),
        Format::Json | Format::Text => {
            println!("{}", serde_json::to_string_pretty(&overview)?)
        }
    }
    Ok(())
}

/// `--output` always writes TSV, so a structured format cannot go with it.
fn check_completeness_output(format: Format, output: Option<&Path>) -> Result<()> {
    match (format, output) {
        (Format::Json | Format::Yaml, Some(_)) => Err(HoloError::InvalidParameter(
            "--output writes TSV; use --format text or print JSON/YAML to stdout".to_string(),
        )),
        _ => Ok(()),
    }
}

/// The overview is nested, so it has no text rendering.
fn check_overview_format(format: Format) -> Result<()> {
    match format {
        Format::Text => Err(HoloError::InvalidParameter(
            "overview supports --format json or yaml".to_string(),
        )),
        Format::Json | Format::Yaml => Ok(()),
    }
}

fn cmd_example_config(output: &PathBuf) -> Result<()> {
    let config = DashboardConfig {
        study_labels: Some(PathBuf::from("study_labels.tsv")),
        ..Default::default()
    };
    std::fs::write(output, config.to_yaml()?)?;
    info!("Example configuration written to {}", output.display());
    Ok(())
}
