//! Daily price/indicator sample.

use chrono::NaiveDate;
use serde::Serialize;

/// One synthetic trading day: closing price and the indicator reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub price: f64,
    pub indicator_value: f64,
}
