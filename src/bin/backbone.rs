//! backbone - Network backbone extraction CLI
//!
//! Command-line interface for scoring and thresholding weighted edge lists.

use clap::{Parser, Subcommand, ValueEnum};
use network_backbone::data::EdgeTable;
use network_backbone::error::Result;
use network_backbone::pipeline::{run_backbone, BackboneResult, Pipeline, PipelineConfig};
use network_backbone::score::{Method, ScoreOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI-friendly method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMethod {
    /// Noise-corrected (Beta-Binomial) score
    Nc,
    /// Disparity filter
    Df,
    /// Raw counts
    Naive,
    /// Maximum spanning tree
    Mst,
}

impl From<CliMethod> for Method {
    fn from(method: CliMethod) -> Self {
        match method {
            CliMethod::Nc => Method::NoiseCorrected,
            CliMethod::Df => Method::DisparityFilter,
            CliMethod::Naive => Method::Naive,
            CliMethod::Mst => Method::MaximumSpanningTree,
        }
    }
}

/// Field delimiter of input and output tables
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// Network backbone extraction
#[derive(Parser)]
#[command(name = "backbone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an edge table with one method, optionally thresholding it
    Score {
        /// Path to edge table with node1, node2 and count columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the scored table
        #[arg(short, long)]
        output: PathBuf,

        /// Scoring method
        #[arg(short, long, value_enum, default_value = "nc")]
        method: CliMethod,

        /// Collapse reciprocal edges using the method's undirected policy
        #[arg(long)]
        undirected: bool,

        /// Keep self-loops
        #[arg(long)]
        self_loops: bool,

        /// Emit a Binomial p-value instead of the score (nc only)
        #[arg(long)]
        p_value: bool,

        /// Keep only edges passing this cutoff
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Write the threshold summary as JSON to this path
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// Field delimiter for input and output
        #[arg(long, value_enum, default_value = "tab")]
        delimiter: Delimiter,
    },

    /// Run a pipeline from a YAML configuration file
    Run {
        /// Path to pipeline configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to edge table
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the scored table
        #[arg(short, long)]
        output: PathBuf,

        /// Write the threshold summary as JSON to this path
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// Field delimiter for input and output
        #[arg(long, value_enum, default_value = "tab")]
        delimiter: Delimiter,
    },

    /// Generate an example pipeline configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "backbone.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "network_backbone={level},backbone={level}",
            level = log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Score {
            input,
            output,
            method,
            undirected,
            self_loops,
            p_value,
            threshold,
            summary_json,
            delimiter,
        } => cmd_score(
            &input,
            &output,
            method.into(),
            ScoreOptions {
                undirected,
                include_self_loops: self_loops,
                p_value,
            },
            threshold,
            summary_json.as_deref(),
            delimiter,
        ),

        Commands::Run {
            config,
            input,
            output,
            summary_json,
            delimiter,
        } => cmd_run(&config, &input, &output, summary_json.as_deref(), delimiter),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_table(path: &Path, delimiter: Delimiter) -> Result<EdgeTable> {
    tracing::info!("Loading edges from {:?}...", path);
    let table = EdgeTable::from_reader(std::fs::File::open(path)?, delimiter.byte())?;
    tracing::info!(
        "Loaded {} edges between {} nodes",
        table.len(),
        table.node_count()
    );
    Ok(table)
}

fn write_result(
    result: &BackboneResult,
    path: &Path,
    summary_json: Option<&Path>,
    delimiter: Delimiter,
) -> Result<()> {
    tracing::info!("Writing results to {:?}...", path);
    result
        .table
        .write_delimited(std::fs::File::create(path)?, delimiter.byte())?;

    match (&result.threshold, summary_json) {
        (Some(summary), Some(json_path)) => {
            eprint!("{}", summary);
            std::fs::write(json_path, summary.to_json()?)?;
            tracing::info!("Threshold summary written to {:?}", json_path);
        }
        (Some(summary), None) => eprint!("{}", summary),
        (None, Some(_)) => tracing::warn!("No threshold step ran; skipping summary JSON"),
        (None, None) => {}
    }
    tracing::info!("Done! {} edges written", result.table.len());
    Ok(())
}

/// Score a table with a single method
fn cmd_score(
    input: &Path,
    output: &Path,
    method: Method,
    options: ScoreOptions,
    threshold: Option<f64>,
    summary_json: Option<&Path>,
    delimiter: Delimiter,
) -> Result<()> {
    let table = load_table(input, delimiter)?;

    tracing::info!("Calculating {} score...", method);
    let result = run_backbone(&table, method, options, threshold)?;

    write_result(&result, output, summary_json, delimiter)
}

/// Run a pipeline from configuration
fn cmd_run(
    config_path: &Path,
    input: &Path,
    output: &Path,
    summary_json: Option<&Path>,
    delimiter: Delimiter,
) -> Result<()> {
    tracing::info!("Loading pipeline configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = PipelineConfig::from_yaml(&config_str)?;

    let table = load_table(input, delimiter)?;

    tracing::info!("Running pipeline '{}'...", config.name);
    let result = Pipeline::from_config(&config).run(&table)?;

    write_result(&result, output, summary_json, delimiter)
}

/// Write an example pipeline configuration
fn cmd_example(output: &Path) -> Result<()> {
    let config = Pipeline::new()
        .name("noise-corrected")
        .noise_corrected(ScoreOptions {
            undirected: true,
            ..Default::default()
        })
        .threshold(1.64)
        .to_config(Some(
            "Undirected noise-corrected backbone keeping edges 1.64 standard deviations above zero",
        ));

    std::fs::write(output, config.to_yaml()?)?;
    tracing::info!("Example configuration written to {:?}", output);
    Ok(())
}
