//! Trade execution for the single-position state machine.
//!
//! Implements entry sizing, exit settlement and the per-sample step that ties
//! the signal evaluator to the portfolio.

use chrono::NaiveDate;

use super::portfolio::Portfolio;
use super::position::{Position, PositionState, TradeRecord};
use super::sample::Sample;
use super::signal::{self, Signal};
use super::strategy::SignalParams;

pub const DEFAULT_POSITION_SIZE: f64 = 0.9;

/// Strategy-independent execution parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    /// Fraction of available cash committed on entry.
    pub position_size: f64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            position_size: DEFAULT_POSITION_SIZE,
        }
    }
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { quantity: u64, cost: f64 },
    InsufficientCapital,
    AlreadyInPosition,
}

/// Result of an exit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitResult {
    Exited { quantity: u64, proceeds: f64, realized_pnl: f64 },
    NoPosition,
}

/// Open a long position at `price`.
///
/// 1. Quantity is `floor(cash * position_size / price)`, whole units only
/// 2. Zero quantity, or a cost above cash, returns `InsufficientCapital`
/// 3. Cost is deducted from cash and a BUY record appended
pub fn enter_long(
    portfolio: &mut Portfolio,
    price: f64,
    date: NaiveDate,
    params: &ExecutionParams,
) -> EntryResult {
    if portfolio.has_position() {
        return EntryResult::AlreadyInPosition;
    }
    if price <= 0.0 || portfolio.cash <= 0.0 {
        return EntryResult::InsufficientCapital;
    }

    let available_capital = portfolio.cash * params.position_size;
    let quantity = (available_capital / price).floor();
    if quantity < 1.0 {
        return EntryResult::InsufficientCapital;
    }
    let quantity = quantity as u64;

    let cost = quantity as f64 * price;
    if cost > portfolio.cash {
        return EntryResult::InsufficientCapital;
    }

    portfolio.cash -= cost;
    portfolio.state = PositionState::InPosition(Position {
        entry_price: price,
        quantity,
        entry_date: date,
    });
    portfolio.record_trade(TradeRecord::buy(date, price, quantity));

    EntryResult::Entered { quantity, cost }
}

/// Close the whole open position at `price`.
pub fn exit_long(portfolio: &mut Portfolio, price: f64, date: NaiveDate) -> ExitResult {
    let Some(position) = portfolio.state.take() else {
        return ExitResult::NoPosition;
    };

    let proceeds = position.market_value(price);
    let realized_pnl = position.unrealized_pnl(price);

    portfolio.cash += proceeds;
    portfolio.record_trade(TradeRecord::sell(date, price, position.quantity, realized_pnl));

    ExitResult::Exited {
        quantity: position.quantity,
        proceeds,
        realized_pnl,
    }
}

/// Process one sample: evaluate signals, act on at most one of them, then
/// record the end-of-day equity point.
pub fn step(
    portfolio: &mut Portfolio,
    sample: &Sample,
    signal_params: &SignalParams,
    exec_params: &ExecutionParams,
) -> Signal {
    let signal = signal::evaluate(sample, portfolio.position(), portfolio.cash, signal_params);

    if signal.exit {
        if let ExitResult::Exited { quantity, realized_pnl, .. } =
            exit_long(portfolio, sample.price, sample.date)
        {
            log::debug!(
                "{}: SELL {} @ {:.2} pnl={:.2}",
                sample.date,
                quantity,
                sample.price,
                realized_pnl
            );
        }
    } else if signal.enter {
        match enter_long(portfolio, sample.price, sample.date, exec_params) {
            EntryResult::Entered { quantity, cost } => {
                log::debug!(
                    "{}: BUY {} @ {:.2} cost={:.2}",
                    sample.date,
                    quantity,
                    sample.price,
                    cost
                );
            }
            EntryResult::InsufficientCapital | EntryResult::AlreadyInPosition => {}
        }
    }

    let equity = portfolio.total_equity(sample.price);
    portfolio.record_equity(sample.date, equity);
    signal
}
