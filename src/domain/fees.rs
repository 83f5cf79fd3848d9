//! Indian equity transaction charges.
//!
//! STT is levied on sell-side turnover only; the exchange transaction charge
//! and the regulator's fee apply to total turnover; GST applies to those two
//! charges. Fees are reported alongside a run, never deducted from equity.

use serde::Serialize;

use super::position::TradeRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    /// Securities Transaction Tax, fraction of sell turnover.
    pub stt_rate: f64,
    /// Regulatory charge, fraction of total turnover.
    pub regulatory_rate: f64,
    /// Exchange transaction charge, fraction of total turnover.
    pub transaction_rate: f64,
    /// GST on (regulatory + transaction) charges.
    pub gst_rate: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            stt_rate: 0.00025,
            regulatory_rate: 0.0000005,
            transaction_rate: 0.0003,
            gst_rate: 0.18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeBreakdown {
    pub stt: f64,
    pub regulatory_charges: f64,
    pub transaction_charges: f64,
    pub gst: f64,
    pub total: f64,
}

impl FeeSchedule {
    pub fn compute(&self, trades: &[TradeRecord]) -> FeeBreakdown {
        let total_turnover: f64 = trades.iter().map(TradeRecord::turnover).sum();
        let sell_turnover: f64 = trades
            .iter()
            .filter(|t| t.is_sell())
            .map(TradeRecord::turnover)
            .sum();

        let stt = sell_turnover * self.stt_rate;
        let regulatory_charges = total_turnover * self.regulatory_rate;
        let transaction_charges = total_turnover * self.transaction_rate;
        let gst = (regulatory_charges + transaction_charges) * self.gst_rate;

        FeeBreakdown {
            stt,
            regulatory_charges,
            transaction_charges,
            gst,
            total: stt + regulatory_charges + transaction_charges + gst,
        }
    }
}
