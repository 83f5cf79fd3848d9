//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::json_strategy_parser::JsonStrategyParser;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestRequest, BacktestResult};
use crate::domain::config_validation::{parse_comparison, validate_config};
use crate::domain::error::SimtraderError;
use crate::domain::execution::ExecutionParams;
use crate::domain::fees::FeeSchedule;
use crate::domain::metrics::DEFAULT_CHART_POINTS;
use crate::domain::price_path::PricePathConfig;
use crate::domain::strategy::{SignalParams, StrategyConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::strategy_parser_port::StrategyParser;

#[derive(Parser, Debug)]
#[command(name = "simtrader", about = "Synthetic-data strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest from command-line arguments
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        end: String,
        /// Strategy text or structured JSON
        #[arg(short, long, conflicts_with = "strategy_file")]
        strategy: Option<String>,
        #[arg(long)]
        strategy_file: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a backtest described by a JSON request file
    RunRequest {
        #[arg(short, long)]
        request: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Seed for the price path; overrides [backtest] seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write the trade log (and equity curve) as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,
    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            symbol,
            start,
            end,
            strategy,
            strategy_file,
            output,
        } => read_strategy(strategy, strategy_file.as_deref()).and_then(|strategy| {
            let request = BacktestRequest {
                strategy: strategy.map(StrategyConfig::Raw),
                symbol: Some(symbol),
                start_date: Some(start),
                end_date: Some(end),
            };
            run_backtest(config.as_deref(), &request, &output)
        }),
        Command::RunRequest {
            request,
            config,
            output,
        } => load_request(&request).and_then(|req| run_backtest(config.as_deref(), &req, &output)),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SimtraderError> {
    FileConfigAdapter::from_file(path)
}

fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, SimtraderError> {
    match path {
        Some(p) => {
            log::info!("Loading config from {}", p.display());
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn load_request(path: &Path) -> Result<BacktestRequest, SimtraderError> {
    log::info!("Loading request from {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_strategy(
    inline: Option<String>,
    file: Option<&Path>,
) -> Result<Option<String>, SimtraderError> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => Ok(Some(fs::read_to_string(path)?)),
        (None, None) => Ok(None),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SimtraderError> {
    validate_config(adapter)?;

    let path_defaults = PricePathConfig::default();
    let signal_defaults = SignalParams::default();
    let fee_defaults = FeeSchedule::default();

    let comparison = adapter
        .get_string("strategy", "comparison")
        .and_then(|c| parse_comparison(&c))
        .unwrap_or(signal_defaults.comparison);

    Ok(BacktestConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            backtest_engine::DEFAULT_INITIAL_CAPITAL,
        ),
        execution: ExecutionParams {
            position_size: adapter.get_double(
                "backtest",
                "position_size",
                ExecutionParams::default().position_size,
            ),
        },
        price_path: PricePathConfig {
            initial_price_min: adapter.get_double(
                "price_path",
                "initial_price_min",
                path_defaults.initial_price_min,
            ),
            initial_price_max: adapter.get_double(
                "price_path",
                "initial_price_max",
                path_defaults.initial_price_max,
            ),
            volatility: adapter.get_double("price_path", "volatility", path_defaults.volatility),
            drift: adapter.get_double("price_path", "drift", path_defaults.drift),
            indicator_min: adapter.get_double(
                "price_path",
                "indicator_min",
                path_defaults.indicator_min,
            ),
            indicator_max: adapter.get_double(
                "price_path",
                "indicator_max",
                path_defaults.indicator_max,
            ),
            max_span_days: adapter.get_int("backtest", "max_span_days", path_defaults.max_span_days),
        },
        default_signals: SignalParams {
            comparison,
            entry_threshold: adapter.get_double(
                "strategy",
                "threshold",
                signal_defaults.entry_threshold,
            ),
            profit_target_pct: adapter.get_double(
                "strategy",
                "profit_target",
                signal_defaults.profit_target_pct,
            ),
            stop_loss_pct: adapter.get_double(
                "strategy",
                "stop_loss",
                signal_defaults.stop_loss_pct,
            ),
        },
        fees: FeeSchedule {
            stt_rate: adapter.get_double("fees", "stt_rate", fee_defaults.stt_rate),
            regulatory_rate: adapter.get_double(
                "fees",
                "regulatory_rate",
                fee_defaults.regulatory_rate,
            ),
            transaction_rate: adapter.get_double(
                "fees",
                "transaction_rate",
                fee_defaults.transaction_rate,
            ),
            gst_rate: adapter.get_double("fees", "gst_rate", fee_defaults.gst_rate),
        },
        chart_points: adapter.get_int("backtest", "chart_points", DEFAULT_CHART_POINTS),
    })
}

/// Command-line seed wins over the config file; `None` means seed from entropy.
pub fn resolve_seed(cli_seed: Option<u64>, adapter: &dyn ConfigPort) -> Option<u64> {
    cli_seed.or_else(|| {
        adapter
            .get_string("backtest", "seed")
            .and_then(|s| s.trim().parse::<u64>().ok())
    })
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::info!("Using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn run_backtest(
    config_path: Option<&Path>,
    request: &BacktestRequest,
    output: &OutputArgs,
) -> Result<(), SimtraderError> {
    let adapter = load_optional_config(config_path)?;
    let bt_config = build_backtest_config(&adapter)?;
    let mut rng = make_rng(resolve_seed(output.seed, &adapter));

    let parser = JsonStrategyParser::new();
    let result = backtest_engine::run_request(
        &mut rng,
        request,
        Some(&parser as &dyn StrategyParser),
        &bt_config,
    )?;

    print_summary(&result);
    write_outputs(&result, output)
}

pub fn write_outputs(result: &BacktestResult, output: &OutputArgs) -> Result<(), SimtraderError> {
    let json = JsonReportAdapter::new(!output.compact);
    match &output.output {
        Some(path) => {
            json.write(result, path)?;
            eprintln!("\nResult written to: {}", path.display());
        }
        None => println!("{}", json.render(result)?),
    }

    if let Some(path) = &output.trades_csv {
        CsvReportAdapter::new().write(result, path)?;
        eprintln!(
            "Trades written to: {} (equity: {})",
            path.display(),
            CsvReportAdapter::equity_path(path).display()
        );
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== {} {} to {} ===", result.symbol, result.start_date, result.end_date);
    if result.strategy_degraded {
        eprintln!("Strategy:         default rule (strategy could not be parsed)");
    }
    eprintln!("Total Return:     {:.2}%", result.total_return_pct);
    eprintln!("Max Drawdown:     -{:.2}%", result.max_drawdown_pct);
    eprintln!("Return/Drawdown:  {:.2}", result.sharpe_like_ratio);
    eprintln!("Closed Trades:    {}", result.trade_count);
    eprintln!("Win Rate:         {:.1}%", result.win_rate);
    eprintln!("Profit Factor:    {:.2}", result.profit_factor);
    eprintln!("Final Equity:     {:.2}", result.final_equity);
    eprintln!("Fees (total):     {:.2}", result.fees.total);
}

fn run_validate(config_path: &Path) -> Result<(), SimtraderError> {
    let adapter = load_config(config_path)?;
    build_backtest_config(&adapter)?;
    eprintln!("Configuration is valid: {}", adapter.source());
    Ok(())
}
