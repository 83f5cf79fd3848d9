//! Strategy configuration and its resolution to concrete signal thresholds.
//!
//! A strategy arrives either structured (from the strategy parser or a JSON
//! request) or as raw text. Raw text and malformed structured input both
//! resolve to the default oversold rule instead of failing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENTRY_THRESHOLD: f64 = 35.0;
pub const DEFAULT_PROFIT_TARGET_PCT: f64 = 5.0;
pub const DEFAULT_STOP_LOSS_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    #[serde(alias = "less_than", alias = "lt", alias = "<")]
    Below,
    #[serde(alias = "greater_than", alias = "gt", alias = ">")]
    Above,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRule {
    pub indicator: String,
    #[serde(alias = "condition")]
    pub comparison: Comparison,
    #[serde(alias = "value")]
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRule {
    #[serde(alias = "profitTarget", alias = "profit_target")]
    pub profit_target_pct: f64,
    #[serde(alias = "stopLoss", alias = "stop_loss")]
    pub stop_loss_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredStrategy {
    pub entry: EntryRule,
    pub exit: ExitRule,
}

/// Variants are tried in order; anything that is neither a well-formed
/// structured strategy nor a string lands in `Malformed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategyConfig {
    Structured(StructuredStrategy),
    Raw(String),
    Malformed(serde_json::Value),
}

/// Concrete thresholds the signal evaluator works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub comparison: Comparison,
    pub entry_threshold: f64,
    pub profit_target_pct: f64,
    pub stop_loss_pct: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            comparison: Comparison::Below,
            entry_threshold: DEFAULT_ENTRY_THRESHOLD,
            profit_target_pct: DEFAULT_PROFIT_TARGET_PCT,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
        }
    }
}

/// Outcome of resolving a [`StrategyConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStrategy {
    pub params: SignalParams,
    /// True when the strategy's intent could not be honoured and defaults apply.
    pub degraded: bool,
}

/// Indicators the synthetic sample carries a value for.
const SUPPORTED_INDICATORS: &[&str] = &["rsi"];

impl StrategyConfig {
    /// Resolve to thresholds, falling back to `defaults` when the strategy is
    /// raw or malformed.
    pub fn resolve(&self, defaults: SignalParams) -> ResolvedStrategy {
        match self {
            StrategyConfig::Structured(s) => match s.to_params() {
                Ok(params) => ResolvedStrategy {
                    params,
                    degraded: false,
                },
                Err(reason) => {
                    log::warn!("structured strategy unusable ({reason}); using default rule");
                    ResolvedStrategy {
                        params: defaults,
                        degraded: true,
                    }
                }
            },
            StrategyConfig::Malformed(value) => {
                log::warn!("strategy has an unrecognised shape ({value}); using default rule");
                ResolvedStrategy {
                    params: defaults,
                    degraded: true,
                }
            }
            StrategyConfig::Raw(text) => {
                log::warn!(
                    "strategy not structured ({} chars of raw text); using default rule",
                    text.len()
                );
                ResolvedStrategy {
                    params: defaults,
                    degraded: true,
                }
            }
        }
    }
}

impl StructuredStrategy {
    fn to_params(&self) -> Result<SignalParams, String> {
        let indicator = self.entry.indicator.trim().to_lowercase();
        if !SUPPORTED_INDICATORS.contains(&indicator.as_str()) {
            return Err(format!("unsupported indicator {:?}", self.entry.indicator));
        }
        let threshold = self.entry.threshold;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(format!("entry threshold {threshold} outside 0..=100"));
        }
        let target = self.exit.profit_target_pct;
        if !target.is_finite() || target <= 0.0 {
            return Err(format!("profit target {target} must be positive"));
        }
        // a stop loss of 100% or more can never trigger on a positive price
        let stop = self.exit.stop_loss_pct.abs();
        if !stop.is_finite() || stop == 0.0 || stop >= 100.0 {
            return Err(format!("stop loss {stop} outside (0, 100)"));
        }
        Ok(SignalParams {
            comparison: self.entry.comparison,
            entry_threshold: threshold,
            profit_target_pct: target,
            stop_loss_pct: stop,
        })
    }
}
