//! Per-sample entry/exit signal evaluation.
//!
//! Entry is only considered while flat and exit only while in a position, so a
//! single sample can never produce both.

use super::position::Position;
use super::sample::Sample;
use super::strategy::{Comparison, SignalParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signal {
    pub enter: bool,
    pub exit: bool,
}

pub fn evaluate(
    sample: &Sample,
    position: Option<&Position>,
    cash: f64,
    params: &SignalParams,
) -> Signal {
    match position {
        None => Signal {
            enter: entry_condition(sample, params) && cash > sample.price,
            exit: false,
        },
        Some(pos) => Signal {
            enter: false,
            exit: pos.should_take_profit(sample.price, params.profit_target_pct)
                || pos.should_stop_loss(sample.price, params.stop_loss_pct),
        },
    }
}

fn entry_condition(sample: &Sample, params: &SignalParams) -> bool {
    match params.comparison {
        Comparison::Below => sample.indicator_value < params.entry_threshold,
        Comparison::Above => sample.indicator_value > params.entry_threshold,
    }
}
