//! Backtest orchestration.
//!
//! Composes price path generation, signal evaluation, the trade engine and the
//! metrics calculator into one call. The only inputs besides the request are
//! the engine configuration, the random source and an optional strategy parser.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimtraderError;
use super::execution::{self, ExecutionParams};
use super::fees::{FeeBreakdown, FeeSchedule};
use super::metrics::{self, DEFAULT_CHART_POINTS, Metrics};
use super::portfolio::{EquityPoint, Portfolio};
use super::position::TradeRecord;
use super::price_path::{self, PricePathConfig};
use super::sample::Sample;
use super::strategy::{SignalParams, StrategyConfig};
use crate::ports::strategy_parser_port::StrategyParser;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub execution: ExecutionParams,
    pub price_path: PricePathConfig,
    /// Thresholds used when the strategy is raw or malformed.
    pub default_signals: SignalParams,
    pub fees: FeeSchedule,
    pub chart_points: i64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            execution: ExecutionParams::default(),
            price_path: PricePathConfig::default(),
            default_signals: SignalParams::default(),
            fees: FeeSchedule::default(),
            chart_points: DEFAULT_CHART_POINTS,
        }
    }
}

/// Request as received from the outer layer; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    pub strategy: Option<StrategyConfig>,
    pub symbol: Option<String>,
    #[serde(alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(alias = "end_date")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_capital: f64,
    pub final_equity: f64,
    pub trade_count: usize,
    pub win_rate: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_like_ratio: f64,
    pub profit_factor: f64,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub fees: FeeBreakdown,
    pub strategy_degraded: bool,
}

/// Full-resolution output of a run, before summarising.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub portfolio: Portfolio,
    pub day_count: i64,
    pub strategy_degraded: bool,
}

/// Run the trade engine over a freshly generated price path.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
    strategy: &StrategyConfig,
    config: &BacktestConfig,
) -> Result<Simulation, SimtraderError> {
    let samples = price_path::generate(rng, start, end, &config.price_path)?;
    let day_count = (end - start).num_days();

    let resolved = strategy.resolve(config.default_signals);
    let portfolio = run_engine(&samples, &resolved.params, config);

    Ok(Simulation {
        portfolio,
        day_count,
        strategy_degraded: resolved.degraded,
    })
}

/// Feed `samples` through the trade engine in order, starting flat with the
/// configured capital.
pub fn run_engine(samples: &[Sample], params: &SignalParams, config: &BacktestConfig) -> Portfolio {
    let mut portfolio = Portfolio::new(config.initial_capital);
    for sample in samples {
        execution::step(&mut portfolio, sample, params, &config.execution);
    }
    portfolio
}

pub fn run_backtest<R: Rng + ?Sized>(
    rng: &mut R,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    strategy: &StrategyConfig,
    config: &BacktestConfig,
) -> Result<BacktestResult, SimtraderError> {
    let sim = simulate(rng, start, end, strategy, config)?;
    let metrics = Metrics::compute(&sim.portfolio);
    let fees = config.fees.compute(&sim.portfolio.trades);

    log::info!(
        "{symbol} {start}..{end}: {} closed trades, return {:.2}%, max drawdown {:.2}%",
        metrics.trade_count,
        metrics.total_return_pct,
        metrics.max_drawdown_pct
    );

    let equity_curve =
        metrics::downsample(&sim.portfolio.equity_curve, sim.day_count, config.chart_points);

    Ok(BacktestResult {
        symbol: symbol.to_string(),
        start_date: start,
        end_date: end,
        starting_capital: sim.portfolio.initial_capital,
        final_equity: metrics.final_equity,
        trade_count: metrics.trade_count,
        win_rate: metrics.win_rate,
        total_return_pct: metrics.total_return_pct,
        max_drawdown_pct: metrics.max_drawdown_pct,
        sharpe_like_ratio: metrics.sharpe_like_ratio,
        profit_factor: metrics.profit_factor,
        trades: sim.portfolio.trades,
        equity_curve,
        fees,
        strategy_degraded: sim.strategy_degraded,
    })
}

/// Validate a boundary request, offer raw strategy text to `parser`, and run.
pub fn run_request<R: Rng + ?Sized>(
    rng: &mut R,
    request: &BacktestRequest,
    parser: Option<&dyn StrategyParser>,
    config: &BacktestConfig,
) -> Result<BacktestResult, SimtraderError> {
    let strategy = request
        .strategy
        .as_ref()
        .filter(|s| !matches!(s, StrategyConfig::Raw(text) if text.trim().is_empty()))
        .ok_or_else(|| SimtraderError::missing("strategy"))?;
    let symbol = required(request.symbol.as_deref(), "symbol")?;
    let start = parse_date(required(request.start_date.as_deref(), "startDate")?, "startDate")?;
    let end = parse_date(required(request.end_date.as_deref(), "endDate")?, "endDate")?;

    let strategy = match (strategy, parser) {
        (StrategyConfig::Raw(text), Some(parser)) => match parser.parse(text) {
            Some(structured) => StrategyConfig::Structured(structured),
            None => strategy.clone(),
        },
        _ => strategy.clone(),
    };

    run_backtest(rng, symbol, start, end, &strategy, config)
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, SimtraderError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SimtraderError::missing(field))
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, SimtraderError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| SimtraderError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
