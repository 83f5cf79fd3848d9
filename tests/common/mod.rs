#![allow(dead_code)]

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use simtrader::domain::backtest::{BacktestConfig, BacktestRequest};
pub use simtrader::domain::sample::Sample;
use simtrader::domain::strategy::{
    Comparison, EntryRule, ExitRule, StrategyConfig, StructuredStrategy,
};
use simtrader::ports::strategy_parser_port::StrategyParser;
use std::cell::RefCell;

/// Parser double that returns a canned answer and records what it was asked.
pub struct MockStrategyParser {
    pub answer: Option<StructuredStrategy>,
    pub seen: RefCell<Vec<String>>,
}

impl MockStrategyParser {
    pub fn returning(answer: Option<StructuredStrategy>) -> Self {
        Self {
            answer,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl StrategyParser for MockStrategyParser {
    fn parse(&self, strategy_text: &str) -> Option<StructuredStrategy> {
        self.seen.borrow_mut().push(strategy_text.to_string());
        self.answer.clone()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn make_sample(date: &str, price: f64, indicator_value: f64) -> Sample {
    Sample {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        price,
        indicator_value,
    }
}

/// Consecutive daily samples with the given prices and indicator readings.
pub fn make_samples(start_date: &str, points: &[(f64, f64)]) -> Vec<Sample> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    points
        .iter()
        .enumerate()
        .map(|(i, &(price, indicator_value))| Sample {
            date: start + chrono::Duration::days(i as i64),
            price,
            indicator_value,
        })
        .collect()
}

pub fn rsi_strategy(threshold: f64, target: f64, stop: f64) -> StructuredStrategy {
    StructuredStrategy {
        entry: EntryRule {
            indicator: "RSI".into(),
            comparison: Comparison::Below,
            threshold,
        },
        exit: ExitRule {
            profit_target_pct: target,
            stop_loss_pct: stop,
        },
    }
}

pub fn raw_strategy() -> StrategyConfig {
    StrategyConfig::Raw("Buy when RSI is oversold, take 5% profit, 2% stop".into())
}

pub fn sample_request() -> BacktestRequest {
    BacktestRequest {
        strategy: Some(raw_strategy()),
        symbol: Some("RELIANCE".into()),
        start_date: Some("2024-01-01".into()),
        end_date: Some("2024-12-31".into()),
    }
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig::default()
}
