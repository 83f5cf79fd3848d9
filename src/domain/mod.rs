//! Core domain types and logic.

pub mod sample;
pub mod price_path;
pub mod strategy;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod fees;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
