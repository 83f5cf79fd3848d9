//! Strategy parsing capability port.

use crate::domain::strategy::StructuredStrategy;

/// Turns strategy text into a structured strategy.
///
/// Implementations absorb their own failures: `None` means "could not parse",
/// and the caller falls back to the default rule.
pub trait StrategyParser {
    fn parse(&self, strategy_text: &str) -> Option<StructuredStrategy>;
}
