use std::path::PathBuf;
use tradeinterval::config::{AppConfig, ConfigManager, EvolutionConfig};
use tradeinterval::data::CsvConnector;
use tradeinterval::engines::analysis::TradingRule;
use tradeinterval::engines::generation::{ChannelProgressCallback, ProgressMessage};
use tradeinterval::engines::{optimize_with_callback, FitnessEvaluator};
use tradeinterval::types::{HOLDING_PERIOD_RANGE, NUM_INTERVALS_RANGE};
use tradeinterval::{analyze, optimize, AnalysisParameters, PriceBar, StockAnalyzer, TradeIntervalError};

fn sawtooth_series(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i % 10) as f64 * 5.0;
            PriceBar::new(i, close + 1.0, close - 1.0, close)
        })
        .collect()
}

fn small_evolution(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 20,
        generations: 10,
        seed: Some(seed),
        ..Default::default()
    }
}

fn sample_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_prices.csv")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tradeinterval_{}_{}", std::process::id(), name))
}

#[test]
fn test_optimize_finds_buy_parameters() {
    let series = sawtooth_series(60);

    let outcome = optimize(&series, &small_evolution(42)).unwrap();

    assert!(outcome.found_solution());
    assert!(outcome.best_fitness.is_finite());
    assert_eq!(outcome.history.len(), 10);

    let best = outcome.best_parameters.unwrap();
    assert!(NUM_INTERVALS_RANGE.contains(&best.num_intervals));
    assert!(HOLDING_PERIOD_RANGE.contains(&best.holding_period));

    // the reported fitness is reproducible from the decoded parameters
    let rescored = FitnessEvaluator::score_parameters(&series, &best);
    assert_eq!(rescored, outcome.best_fitness);
    assert!(analyze(&series, &best).iter().any(|i| i.is_buy_signal));
}

#[test]
fn test_optimize_is_reproducible() {
    let series = sawtooth_series(60);
    let first = optimize(&series, &small_evolution(99)).unwrap();
    let second = optimize(&series, &small_evolution(99)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_optimize_on_flat_series_finds_nothing() {
    let series: Vec<PriceBar> = (0..40).map(|i| PriceBar::new(i, 100.0, 100.0, 100.0)).collect();

    let outcome = optimize(&series, &small_evolution(1)).unwrap();

    assert!(!outcome.found_solution());
    assert!(outcome.best_chromosome.is_none());
    assert_eq!(outcome.best_fitness, f64::NEG_INFINITY);
}

#[test]
fn test_optimize_rejects_invalid_config() {
    let config = EvolutionConfig {
        crossover_rate: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        optimize(&sawtooth_series(60), &config),
        Err(TradeIntervalError::Configuration(_))
    ));
}

#[test]
fn test_progress_reaches_channel() {
    let series = sawtooth_series(60);
    let (tx, rx) = std::sync::mpsc::channel();
    let mut callback = ChannelProgressCallback::new(tx);

    optimize_with_callback(&series, &small_evolution(5), &mut callback).unwrap();

    let messages: Vec<ProgressMessage> = rx.try_iter().collect();
    assert_eq!(messages.len(), 20);
    assert_eq!(messages[0], ProgressMessage::GenerationStart(0));
    assert!(matches!(
        messages.last(),
        Some(ProgressMessage::GenerationComplete(summary)) if summary.generation == 9
    ));
}

#[test]
fn test_stock_analyzer_session() {
    let config = AppConfig {
        evolution: small_evolution(42),
        ..Default::default()
    };
    let mut analyzer = StockAnalyzer::new("SAW", sawtooth_series(60), config).unwrap();
    assert_eq!(*analyzer.parameters(), AnalysisParameters::default());
    assert!(analyzer.last_outcome().is_none());

    let best = analyzer.optimize_parameters().unwrap().best_parameters.unwrap();
    assert_eq!(*analyzer.parameters(), best);

    let report = analyzer.report();
    assert_eq!(report.symbol, "SAW");
    assert_eq!(report.parameters, best);
    assert_eq!(report.rules.len(), report.intervals.len());
    assert!(report.optimization.is_some());

    for rule in analyzer.trading_rules() {
        if let TradingRule::Buy { band, stop_loss, .. } = rule {
            assert!((stop_loss - band.lower * 0.8).abs() < 1e-9);
        }
    }
    assert!(analyzer.trading_rules().iter().any(TradingRule::is_buy));

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"symbol\":\"SAW\""));
}

#[test]
fn test_stock_analyzer_rejects_invalid_parameters() {
    let mut analyzer =
        StockAnalyzer::new("SAW", sawtooth_series(60), AppConfig::default()).unwrap();
    let invalid = AnalysisParameters {
        num_intervals: 9,
        ..Default::default()
    };
    assert!(analyzer.set_parameters(invalid).is_err());
    assert_eq!(*analyzer.parameters(), AnalysisParameters::default());
}

#[test]
fn test_load_sample_csv() {
    let (bars, metadata) = CsvConnector::load_bars(sample_csv(), 30).unwrap();

    assert_eq!(bars.len(), 60);
    assert_eq!(metadata.num_rows, 60);
    assert_eq!(metadata.skipped_rows, 0);
    assert_eq!(metadata.price_range, (99.0, 146.0));
    assert!(metadata.date_range.is_some());
    assert_eq!(bars[0].close, 100.0);
    assert_eq!(bars[0].open, Some(99.5));
    assert!(bars.iter().enumerate().all(|(i, b)| b.index == i));

    assert!(CsvConnector::load_bars(sample_csv(), 100).is_err());
}

#[test]
fn test_config_file_overrides_defaults() {
    let path = temp_path("overrides.toml");
    std::fs::write(
        &path,
        "[evolution]\npopulation_size = 12\nseed = 7\n\n[analysis]\nstop_loss_ratio = 0.1\n",
    )
    .unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.evolution.population_size, 12);
    assert_eq!(config.evolution.seed, Some(7));
    assert_eq!(config.evolution.generations, EvolutionConfig::default().generations);
    assert_eq!(config.analysis.stop_loss_ratio, 0.1);
    assert_eq!(config.data, AppConfig::default().data);
}

#[test]
fn test_config_file_with_invalid_values_fails() {
    let path = temp_path("invalid.toml");
    std::fs::write(&path, "[evolution]\npopulation_size = 7\n").unwrap();

    let result = AppConfig::load(Some(&path));
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(TradeIntervalError::Configuration(_))));
}

#[test]
fn test_config_manager_save_and_reload() {
    let path = temp_path("manager.toml");
    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.evolution.generations = 25;
            config.analysis.parameters.holding_period = 15;
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(reloaded.get().unwrap(), manager.get().unwrap());
    assert_eq!(reloaded.get().unwrap().evolution.generations, 25);
}

#[test]
fn test_config_manager_update_keeps_valid_state() {
    let manager = ConfigManager::new();

    let result = manager.update(|config| config.evolution.mutation_rate = -0.5);

    assert!(result.is_err());
    assert_eq!(manager.get().unwrap(), AppConfig::default());
}
