//! Performance metrics for a completed run.

use super::portfolio::{EquityPoint, Portfolio};

/// Reported when there are winning trades and no losing ones.
pub const PROFIT_FACTOR_NO_LOSSES: f64 = 10.0;

/// Default number of points targeted by [`downsample`].
pub const DEFAULT_CHART_POINTS: i64 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub trade_count: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    /// Percent of closed trades with positive pnl.
    pub win_rate: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    /// Return over drawdown, `total_return_pct / max(max_drawdown_pct, 1)`.
    ///
    /// This is a coarse reward/risk proxy, not a Sharpe ratio: it ignores the
    /// volatility of returns and any risk-free rate.
    pub sharpe_like_ratio: f64,
    pub profit_factor: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub final_equity: f64,
}

impl Metrics {
    pub fn compute(portfolio: &Portfolio) -> Self {
        let initial_capital = portfolio.initial_capital;
        let final_equity = portfolio.final_equity();

        let total_return_pct = if initial_capital > 0.0 {
            (final_equity - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let max_drawdown_pct = compute_max_drawdown(&portfolio.equity_curve, initial_capital);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;

        for pnl in portfolio.closed_trades().filter_map(|t| t.realized_pnl) {
            if pnl > 0.0 {
                trades_won += 1;
                gross_profit += pnl;
            } else {
                trades_lost += 1;
                if pnl < 0.0 {
                    gross_loss += pnl.abs();
                }
            }
        }

        let trade_count = trades_won + trades_lost;
        let win_rate = if trade_count > 0 {
            trades_won as f64 / trade_count as f64 * 100.0
        } else {
            0.0
        };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            PROFIT_FACTOR_NO_LOSSES
        } else {
            0.0
        };

        Metrics {
            trade_count,
            trades_won,
            trades_lost,
            win_rate,
            total_return_pct,
            max_drawdown_pct,
            sharpe_like_ratio: total_return_pct / max_drawdown_pct.max(1.0),
            profit_factor,
            gross_profit,
            gross_loss,
            final_equity,
        }
    }
}

/// Largest peak-to-trough decline in percent. The running peak starts at
/// `initial_capital`.
fn compute_max_drawdown(equity_curve: &[EquityPoint], initial_capital: f64) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (peak - point.equity) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Thin the curve for display: keep every Nth point, N = max(1, day_count / target).
/// The first point is always kept. Never feed the result back into metrics.
pub fn downsample(equity_curve: &[EquityPoint], day_count: i64, target: i64) -> Vec<EquityPoint> {
    let stride = if target > 0 {
        (day_count / target).max(1) as usize
    } else {
        1
    };
    equity_curve.iter().step_by(stride).cloned().collect()
}
