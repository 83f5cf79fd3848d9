//! Open position and trade records.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_price: f64,
    pub quantity: u64,
    pub entry_date: NaiveDate,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    /// Percentage move of `price` relative to the entry price.
    pub fn pct_change(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price * 100.0
    }

    pub fn should_take_profit(&self, price: f64, profit_target_pct: f64) -> bool {
        self.pct_change(price) >= profit_target_pct
    }

    pub fn should_stop_loss(&self, price: f64, stop_loss_pct: f64) -> bool {
        self.pct_change(price) <= -stop_loss_pct
    }
}

/// Two-state position machine: either flat or holding exactly one position.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    InPosition(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Flat => None,
            PositionState::InPosition(pos) => Some(pos),
        }
    }

    /// Leave the position, returning it. `Flat` stays `Flat`.
    pub fn take(&mut self) -> Option<Position> {
        match std::mem::take(self) {
            PositionState::Flat => None,
            PositionState::InPosition(pos) => Some(pos),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub side: Side,
    pub price: f64,
    pub quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,
}

impl TradeRecord {
    pub fn buy(date: NaiveDate, price: f64, quantity: u64) -> Self {
        TradeRecord {
            date,
            side: Side::Buy,
            price,
            quantity,
            realized_pnl: None,
        }
    }

    pub fn sell(date: NaiveDate, price: f64, quantity: u64, realized_pnl: f64) -> Self {
        TradeRecord {
            date,
            side: Side::Sell,
            price,
            quantity,
            realized_pnl: Some(realized_pnl),
        }
    }

    /// Traded value (price × quantity).
    pub fn turnover(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_position() -> Position {
        Position {
            entry_price: 100.0,
            quantity: 10,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn market_value() {
        assert_relative_eq!(sample_position().market_value(110.0), 1100.0);
    }

    #[test]
    fn unrealized_pnl_profit_and_loss() {
        let pos = sample_position();
        assert_relative_eq!(pos.unrealized_pnl(106.0), 60.0);
        assert_relative_eq!(pos.unrealized_pnl(95.0), -50.0);
    }

    #[test]
    fn take_profit_triggered_at_target() {
        let pos = sample_position();
        assert!(pos.should_take_profit(105.0, 5.0));
        assert!(pos.should_take_profit(107.0, 5.0));
        assert!(!pos.should_take_profit(104.9, 5.0));
    }

    #[test]
    fn stop_loss_triggered_at_bound() {
        let pos = sample_position();
        assert!(pos.should_stop_loss(98.0, 2.0));
        assert!(pos.should_stop_loss(90.0, 2.0));
        assert!(!pos.should_stop_loss(98.5, 2.0));
    }

    #[test]
    fn state_take_returns_position_and_goes_flat() {
        let mut state = PositionState::InPosition(sample_position());
        assert!(!state.is_flat());
        let pos = state.take();
        assert_eq!(pos, Some(sample_position()));
        assert!(state.is_flat());
        assert_eq!(state.take(), None);
    }

    #[test]
    fn sell_record_carries_pnl() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let sell = TradeRecord::sell(date, 106.0, 10, 60.0);
        assert!(sell.is_sell());
        assert_eq!(sell.realized_pnl, Some(60.0));
        assert_relative_eq!(sell.turnover(), 1060.0);

        let buy = TradeRecord::buy(date, 100.0, 10);
        assert!(!buy.is_sell());
        assert_eq!(buy.realized_pnl, None);
    }

    #[test]
    fn buy_record_serializes_without_pnl() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let json = serde_json::to_string(&TradeRecord::buy(date, 100.0, 10)).unwrap();
        assert!(json.contains("\"side\":\"BUY\""));
        assert!(!json.contains("realized_pnl"));
    }
}
