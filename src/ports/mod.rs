//! Port traits at the boundaries of the domain.

pub mod config_port;
pub mod strategy_parser_port;
pub mod report_port;
