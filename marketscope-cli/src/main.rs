//! Marketscope CLI - market attractiveness analytics

// Global invariants enforced:
// - Deterministic output ordering
// - With a fixed seed, identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use marketscope_core::comparison::Selection;
use marketscope_core::config::{self, ResolvedConfig};
use marketscope_core::projection::grid::DEFAULT_GRID_FIELDS;
use marketscope_core::projection::RadarMetric;
use marketscope_core::report::{
    render_analysis_text, render_comparison_text, render_json, render_prediction_text,
};
use marketscope_core::scenario::ScenarioParameters;
use marketscope_core::{Engine, EngineSettings, Field, Industry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketscope")]
#[command(about = "Market attractiveness analytics for SME expansion")]
#[command(version = env!("MARKETSCOPE_VERSION"))]
struct Cli {
    /// Path to config file (default: auto-discover)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Market data file (JSON array of records, overrides config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank markets and the factors driving their attractiveness
    Analyze {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Show only top N rankings and features
        #[arg(long)]
        top: Option<usize>,

        /// Seed for simulated confidence (overrides config file)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Predict the attractiveness of a hypothetical market
    Predict {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Compare up to five countries side by side
    Compare {
        /// Country to include (repeatable, default: top three ranked)
        #[arg(long = "country")]
        countries: Vec<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Emit chart geometry as JSON
    Project {
        #[command(subcommand)]
        chart: Chart,
    },
    /// Validate or inspect configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum Chart {
    /// Radar polygons for selected countries
    Radar {
        /// Country to plot (repeatable, default: top three ranked)
        #[arg(long = "country")]
        countries: Vec<String>,
    },
    /// Correlation matrix grid
    Grid {
        /// Field to include (repeatable, default: first six features)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Score vs confidence scatter
    Scatter {
        /// Seed for simulated confidence (overrides config file)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running analysis
    Validate,
    /// Show the resolved configuration (merged defaults + config file)
    Show,
}

#[derive(clap::Args)]
struct ScenarioArgs {
    #[arg(long)]
    gdp_growth: Option<f64>,
    #[arg(long)]
    per_capita_income: Option<f64>,
    #[arg(long)]
    inflation_rate: Option<f64>,
    #[arg(long)]
    internet_penetration: Option<f64>,
    #[arg(long)]
    ecommerce_adoption: Option<f64>,
    #[arg(long = "5g-coverage", alias = "coverage-5g")]
    coverage_5g: Option<f64>,
    #[arg(long)]
    individualism: Option<f64>,
    #[arg(long)]
    uncertainty_avoidance: Option<f64>,
    #[arg(long)]
    export_volume: Option<f64>,
    #[arg(long)]
    tariff_rate: Option<f64>,

    /// Primary SME industry (IT, Manufacturing, Agriculture, other)
    #[arg(long, default_value = "IT")]
    industry: Industry,
}

impl ScenarioArgs {
    /// Defaults overlaid with whatever was passed on the command line
    fn to_parameters(&self) -> anyhow::Result<ScenarioParameters> {
        let mut params = ScenarioParameters {
            sme_industry: self.industry,
            ..ScenarioParameters::default()
        };
        let overrides = [
            (Field::GdpGrowth, self.gdp_growth),
            (Field::PerCapitaIncome, self.per_capita_income),
            (Field::InflationRate, self.inflation_rate),
            (Field::InternetPenetration, self.internet_penetration),
            (Field::EcommerceAdoption, self.ecommerce_adoption),
            (Field::Coverage5g, self.coverage_5g),
            (Field::Individualism, self.individualism),
            (Field::UncertaintyAvoidance, self.uncertainty_avoidance),
            (Field::ExportVolume, self.export_volume),
            (Field::TariffRate, self.tariff_rate),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                params.set(field.as_str(), v)?;
            }
        }
        Ok(params)
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { format, top, seed } => {
            let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), seed)?;
            let analysis = engine.analyze().context("analysis failed")?;
            match format {
                OutputFormat::Text => print!("{}", render_analysis_text(&analysis, top)),
                OutputFormat::Json => println!("{}", render_json(&analysis)),
            }
        }
        Commands::Predict { scenario, format } => {
            let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), None)?;
            let params = scenario.to_parameters()?;
            let result = engine
                .predict_scenario(&params)
                .context("scenario prediction failed")?;
            match format {
                OutputFormat::Text => print!("{}", render_prediction_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
            }
        }
        Commands::Compare { countries, format } => {
            let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), None)?;
            let selection = select_countries(&engine, &countries)?;
            let summary = engine.compare(&selection).context("comparison failed")?;
            match format {
                OutputFormat::Text => print!("{}", render_comparison_text(&summary)),
                OutputFormat::Json => println!("{}", render_json(&summary)),
            }
        }
        Commands::Project { chart } => match chart {
            Chart::Radar { countries } => {
                let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), None)?;
                let selection = select_countries(&engine, &countries)?;
                let layout = engine.project_radar(&selection, &RadarMetric::defaults())?;
                println!("{}", render_json(&layout));
            }
            Chart::Grid { fields } => {
                let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), None)?;
                let fields = if fields.is_empty() {
                    DEFAULT_GRID_FIELDS.iter().map(|f| f.as_str().to_string()).collect()
                } else {
                    fields
                };
                let layout = engine.project_correlation_grid(&fields)?;
                println!("{}", render_json(&layout));
            }
            Chart::Scatter { seed } => {
                let engine = load_engine(cli.config.as_ref(), cli.data.as_ref(), seed)?;
                let analysis = engine.analyze().context("analysis failed")?;
                let points = engine.project_scatter(&analysis.rankings)?;
                println!("{}", render_json(&points));
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Validate => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, cli.config.as_deref())
                    .and_then(|config| config.load_dataset().map(|_| config));

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, cli.config.as_deref())
                    .context("failed to load configuration")?;
                print_resolved_config(&resolved);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Resolve config, apply CLI overrides and load the dataset
fn load_engine(
    config_path: Option<&PathBuf>,
    data: Option<&PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<Engine> {
    let project_root = std::env::current_dir()?;
    let mut resolved = config::load_and_resolve(&project_root, config_path.map(|p| p.as_path()))
        .context("failed to load configuration")?;

    if let Some(config_path) = &resolved.config_path {
        eprintln!("Using config: {}", config_path.display());
    }

    // --data is relative to the working directory, not the config file
    if let Some(data) = data {
        resolved.dataset_path = Some(if data.is_relative() {
            project_root.join(data)
        } else {
            data.clone()
        });
    }

    let dataset = resolved.load_dataset()?;
    log::debug!("loaded {} markets", dataset.len());
    let mut settings = EngineSettings::from(&resolved);
    if seed.is_some() {
        settings.seed = seed;
    }
    Ok(Engine::with_settings(dataset, settings))
}

/// Explicit countries, or the top three ranked when none are given
fn select_countries(engine: &Engine, countries: &[String]) -> anyhow::Result<Selection> {
    if countries.is_empty() {
        let analysis = engine.analyze().context("analysis failed")?;
        return Ok(Selection::top_ranked(&analysis.rankings, 3));
    }

    let mut selection = Selection::new();
    for country in countries {
        if selection.contains(country) {
            continue;
        }
        if !selection.toggle(country) {
            anyhow::bail!(
                "at most {} countries can be compared",
                marketscope_core::comparison::MAX_SELECTED
            );
        }
    }
    Ok(selection)
}

fn print_resolved_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!(
        "  Dataset: {}",
        resolved
            .dataset_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    println!(
        "  Seed: {}",
        resolved
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none (random per run)".to_string())
    );
    println!();
    println!("Confidence:");
    println!("  min: {}", resolved.confidence.min());
    println!("  max: {}", resolved.confidence.max());
    println!();
    println!("Model metrics:");
    println!("  train_r2: {}", resolved.model_metrics.train_r2);
    println!("  test_r2: {}", resolved.model_metrics.test_r2);
    println!("  test_mse: {}", resolved.model_metrics.test_mse);
    println!();
    println!("Weights:");
    for field in Field::FEATURES {
        if let Some(w) = resolved.predictor.weights.get(field) {
            println!("  {}: {}", field, w);
        }
    }
    println!();
    println!("Thresholds:");
    println!("  moderate: {}", resolved.predictor.thresholds.moderate);
    println!("  high: {}", resolved.predictor.thresholds.high);
    println!("  scenario_policy: {:?}", resolved.predictor.policy);
    println!("  high_confidence: {}", resolved.summary.high_confidence);
    println!("  emerging_below: {}", resolved.summary.emerging_below);
}
