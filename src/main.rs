use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tradeinterval::config::AppConfig;
use tradeinterval::data::CsvConnector;
use tradeinterval::{AnalysisParameters, StockAnalyzer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Price-interval trading signals tuned by a genetic algorithm", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a price series with fixed parameters
    Analyze {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        intervals: Option<usize>,
        #[arg(long)]
        holding_period: Option<usize>,
        #[arg(long)]
        target_profit_ratio: Option<f64>,
        #[arg(long)]
        confidence_threshold: Option<f64>,
    },
    /// Search for the best parameters, then analyze with them
    Optimize {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        generations: Option<usize>,
        #[arg(long)]
        population_size: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// OHLC CSV file (date column optional)
    #[arg(long)]
    data: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            common,
            intervals,
            holding_period,
            target_profit_ratio,
            confidence_threshold,
        } => {
            let mut config = load_config(common.config.as_deref())?;
            let defaults = config.analysis.parameters;
            config.analysis.parameters = AnalysisParameters::new(
                intervals.unwrap_or(defaults.num_intervals),
                holding_period.unwrap_or(defaults.holding_period),
                target_profit_ratio.unwrap_or(defaults.target_profit_ratio),
                confidence_threshold.unwrap_or(defaults.confidence_threshold),
            )
            .context("Invalid analysis parameters")?;

            let analyzer = build_analyzer(&common.data, config)?;
            print_report(&analyzer, common.json)
        }
        Command::Optimize {
            common,
            generations,
            population_size,
            seed,
        } => {
            let mut config = load_config(common.config.as_deref())?;
            if let Some(generations) = generations {
                config.evolution.generations = generations;
            }
            if let Some(population_size) = population_size {
                config.evolution.population_size = population_size;
            }
            if seed.is_some() {
                config.evolution.seed = seed;
            }

            let mut analyzer = build_analyzer(&common.data, config)?;
            analyzer
                .optimize_parameters()
                .context("Optimization failed")?;
            print_report(&analyzer, common.json)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}

fn build_analyzer(data: &Path, config: AppConfig) -> Result<StockAnalyzer> {
    let (bars, _metadata) = CsvConnector::load_bars(data, config.data.min_rows)
        .with_context(|| format!("Failed to load price data from {}", data.display()))?;
    let symbol = data
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "series".to_string());

    Ok(StockAnalyzer::new(symbol, bars, config)?)
}

fn print_report(analyzer: &StockAnalyzer, json: bool) -> Result<()> {
    let report = analyzer.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== {} ===", report.symbol);
    if report.rules.is_empty() {
        println!("No interval received any samples; try a shorter holding period.");
    }
    for rule in &report.rules {
        println!("{}\n", rule);
    }

    if let Some(outcome) = &report.optimization {
        match &outcome.best_parameters {
            Some(best) => {
                println!("Best parameters:");
                println!("  intervals: {}", best.num_intervals);
                println!("  holding period: {} bars", best.holding_period);
                println!("  target profit ratio: {:.2}", best.target_profit_ratio);
                println!("  confidence threshold: {:.2}", best.confidence_threshold);
                println!("  best fitness: {:.4}", outcome.best_fitness);
            }
            None => println!("Optimization produced no improving solution."),
        }
    }
    Ok(())
}
