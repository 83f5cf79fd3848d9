//! CSV trade log and equity curve writers implementing ReportPort.
//!
//! The trade log goes to the requested path; the equity curve is written next
//! to it with an `_equity` suffix on the file stem.

use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SimtraderError;
use crate::domain::portfolio::EquityPoint;
use crate::domain::position::TradeRecord;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    pub fn equity_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        output_path.with_file_name(format!("{stem}_equity.csv"))
    }

    pub fn write_trades<W: std::io::Write>(
        writer: W,
        trades: &[TradeRecord],
    ) -> Result<(), SimtraderError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["date", "side", "price", "quantity", "realized_pnl"])?;
        for trade in trades {
            let side = if trade.is_sell() { "SELL" } else { "BUY" };
            let pnl = trade
                .realized_pnl
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default();
            wtr.write_record([
                trade.date.format("%Y-%m-%d").to_string(),
                side.to_string(),
                format!("{:.2}", trade.price),
                trade.quantity.to_string(),
                pnl,
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_equity<W: std::io::Write>(
        writer: W,
        curve: &[EquityPoint],
    ) -> Result<(), SimtraderError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["date", "equity"])?;
        for point in curve {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", point.equity),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), SimtraderError> {
        let trades = std::fs::File::create(output_path)?;
        Self::write_trades(trades, &result.trades)?;

        let equity = std::fs::File::create(Self::equity_path(output_path))?;
        Self::write_equity(equity, &result.equity_curve)?;
        Ok(())
    }
}
