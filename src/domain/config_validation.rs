//! Configuration validation.
//!
//! Every key is optional; present values must be in range before a run starts.

use crate::domain::error::SimtraderError;
use crate::domain::strategy::Comparison;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    validate_backtest_section(config)?;
    validate_price_path_section(config)?;
    validate_strategy_section(config)?;
    validate_fees_section(config)?;
    Ok(())
}

fn validate_backtest_section(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    let capital = numeric(config, "backtest", "initial_capital")?;
    if capital.is_some_and(|v| v <= 0.0) {
        return Err(SimtraderError::invalid_config(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    let size = numeric(config, "backtest", "position_size")?;
    if size.is_some_and(|v| v <= 0.0 || v > 1.0) {
        return Err(SimtraderError::invalid_config(
            "backtest",
            "position_size",
            "position_size must be between 0 and 1",
        ));
    }
    let span = integer(config, "backtest", "max_span_days")?;
    if span.is_some_and(|v| v <= 0) {
        return Err(SimtraderError::invalid_config(
            "backtest",
            "max_span_days",
            "max_span_days must be positive",
        ));
    }
    let points = integer(config, "backtest", "chart_points")?;
    if points.is_some_and(|v| v <= 0) {
        return Err(SimtraderError::invalid_config(
            "backtest",
            "chart_points",
            "chart_points must be positive",
        ));
    }
    if let Some(seed) = config.get_string("backtest", "seed").filter(|s| !s.trim().is_empty()) {
        if seed.trim().parse::<u64>().is_err() {
            return Err(SimtraderError::invalid_config(
                "backtest",
                "seed",
                "seed must be a non-negative integer",
            ));
        }
    }
    Ok(())
}

fn validate_price_path_section(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    let price_min = numeric(config, "price_path", "initial_price_min")?;
    let price_max = numeric(config, "price_path", "initial_price_max")?;
    for (key, value) in [("initial_price_min", price_min), ("initial_price_max", price_max)] {
        if value.is_some_and(|v| v <= 0.0) {
            return Err(SimtraderError::invalid_config(
                "price_path",
                key,
                "initial prices must be positive",
            ));
        }
    }
    if let (Some(lo), Some(hi)) = (price_min, price_max) {
        if hi < lo {
            return Err(SimtraderError::invalid_config(
                "price_path",
                "initial_price_max",
                "initial_price_max must not be below initial_price_min",
            ));
        }
    }
    let volatility = numeric(config, "price_path", "volatility")?;
    if volatility.is_some_and(|v| !(0.0..1.0).contains(&v)) {
        return Err(SimtraderError::invalid_config(
            "price_path",
            "volatility",
            "volatility must be in [0, 1)",
        ));
    }
    let drift = numeric(config, "price_path", "drift")?;
    if drift.is_some_and(|v| v <= -0.5 || v >= 0.5) {
        return Err(SimtraderError::invalid_config(
            "price_path",
            "drift",
            "drift must be in (-0.5, 0.5)",
        ));
    }
    let ind_min = numeric(config, "price_path", "indicator_min")?;
    let ind_max = numeric(config, "price_path", "indicator_max")?;
    for (key, value) in [("indicator_min", ind_min), ("indicator_max", ind_max)] {
        if value.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
            return Err(SimtraderError::invalid_config(
                "price_path",
                key,
                "indicator bounds must be in [0, 100]",
            ));
        }
    }
    if let (Some(lo), Some(hi)) = (ind_min, ind_max) {
        if hi < lo {
            return Err(SimtraderError::invalid_config(
                "price_path",
                "indicator_max",
                "indicator_max must not be below indicator_min",
            ));
        }
    }
    Ok(())
}

fn validate_strategy_section(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    if let Some(indicator) = config.get_string("strategy", "indicator") {
        if !indicator.trim().eq_ignore_ascii_case("rsi") {
            return Err(SimtraderError::invalid_config(
                "strategy",
                "indicator",
                "only RSI is supported",
            ));
        }
    }
    if let Some(comparison) = config.get_string("strategy", "comparison") {
        if parse_comparison(&comparison).is_none() {
            return Err(SimtraderError::invalid_config(
                "strategy",
                "comparison",
                "comparison must be 'below' or 'above'",
            ));
        }
    }
    let threshold = numeric(config, "strategy", "threshold")?;
    if threshold.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
        return Err(SimtraderError::invalid_config(
            "strategy",
            "threshold",
            "threshold must be in [0, 100]",
        ));
    }
    let target = numeric(config, "strategy", "profit_target")?;
    if target.is_some_and(|v| v <= 0.0) {
        return Err(SimtraderError::invalid_config(
            "strategy",
            "profit_target",
            "profit_target must be positive",
        ));
    }
    let stop = numeric(config, "strategy", "stop_loss")?;
    if stop.is_some_and(|v| v <= 0.0 || v >= 100.0) {
        return Err(SimtraderError::invalid_config(
            "strategy",
            "stop_loss",
            "stop_loss must be in (0, 100)",
        ));
    }
    Ok(())
}

fn validate_fees_section(config: &dyn ConfigPort) -> Result<(), SimtraderError> {
    for key in ["stt_rate", "regulatory_rate", "transaction_rate", "gst_rate"] {
        if numeric(config, "fees", key)?.is_some_and(|v| v < 0.0) {
            return Err(SimtraderError::invalid_config(
                "fees",
                key,
                "fee rates must be non-negative",
            ));
        }
    }
    Ok(())
}

pub fn parse_comparison(value: &str) -> Option<Comparison> {
    match value.trim().to_lowercase().as_str() {
        "below" | "<" | "lt" => Some(Comparison::Below),
        "above" | ">" | "gt" => Some(Comparison::Above),
        _ => None,
    }
}

/// Present numeric value, or `ConfigInvalid` when present but unparsable.
fn numeric(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, SimtraderError> {
    if !config.has_key(section, key) {
        return Ok(None);
    }
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| {
                SimtraderError::invalid_config(section, key, &format!("{key} must be a number"))
            }),
    }
}

fn integer(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, SimtraderError> {
    if !config.has_key(section, key) {
        return Ok(None);
    }
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s.trim().parse::<i64>().map(Some).map_err(|_| {
            SimtraderError::invalid_config(section, key, &format!("{key} must be an integer"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn validate(ini: &str) -> Result<(), SimtraderError> {
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        validate_config(&adapter)
    }

    fn invalid_key(ini: &str) -> String {
        match validate(ini) {
            Err(SimtraderError::ConfigInvalid { key, .. }) => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate("").is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let ini = r#"
[backtest]
initial_capital = 100000
position_size = 0.9
max_span_days = 3650
chart_points = 50
seed = 42

[price_path]
initial_price_min = 2000
initial_price_max = 3000
volatility = 0.03
drift = 0.02
indicator_min = 30
indicator_max = 70

[strategy]
indicator = RSI
comparison = below
threshold = 35
profit_target = 5
stop_loss = 2

[fees]
stt_rate = 0.00025
regulatory_rate = 0.0000005
transaction_rate = 0.0003
gst_rate = 0.18
"#;
        assert!(validate(ini).is_ok());
    }

    #[test]
    fn rejects_bad_backtest_values() {
        assert_eq!(invalid_key("[backtest]\ninitial_capital = 0\n"), "initial_capital");
        assert_eq!(invalid_key("[backtest]\ninitial_capital = lots\n"), "initial_capital");
        assert_eq!(invalid_key("[backtest]\nposition_size = 1.5\n"), "position_size");
        assert_eq!(invalid_key("[backtest]\nmax_span_days = 0\n"), "max_span_days");
        assert_eq!(invalid_key("[backtest]\nchart_points = -1\n"), "chart_points");
        assert_eq!(invalid_key("[backtest]\nseed = -4\n"), "seed");
    }

    #[test]
    fn rejects_bad_price_path_values() {
        assert_eq!(invalid_key("[price_path]\ninitial_price_min = -1\n"), "initial_price_min");
        assert_eq!(
            invalid_key("[price_path]\ninitial_price_min = 10\ninitial_price_max = 5\n"),
            "initial_price_max"
        );
        assert_eq!(invalid_key("[price_path]\nvolatility = 1.2\n"), "volatility");
        assert_eq!(invalid_key("[price_path]\ndrift = 0.5\n"), "drift");
        assert_eq!(invalid_key("[price_path]\nindicator_max = 120\n"), "indicator_max");
        assert_eq!(
            invalid_key("[price_path]\nindicator_min = 60\nindicator_max = 40\n"),
            "indicator_max"
        );
    }

    #[test]
    fn rejects_bad_strategy_values() {
        assert_eq!(invalid_key("[strategy]\nindicator = MACD\n"), "indicator");
        assert_eq!(invalid_key("[strategy]\ncomparison = crosses\n"), "comparison");
        assert_eq!(invalid_key("[strategy]\nthreshold = 101\n"), "threshold");
        assert_eq!(invalid_key("[strategy]\nprofit_target = 0\n"), "profit_target");
        assert_eq!(invalid_key("[strategy]\nstop_loss = 100\n"), "stop_loss");
    }

    #[test]
    fn rejects_negative_fee_rate() {
        assert_eq!(invalid_key("[fees]\ngst_rate = -0.18\n"), "gst_rate");
    }

    #[test]
    fn parse_comparison_variants() {
        assert_eq!(parse_comparison("Below"), Some(Comparison::Below));
        assert_eq!(parse_comparison(" > "), Some(Comparison::Above));
        assert_eq!(parse_comparison("sideways"), None);
    }
}
