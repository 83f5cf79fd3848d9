//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for simtrader.
#[derive(Debug, thiserror::Error)]
pub enum SimtraderError {
    #[error("invalid date range {start} to {end}: {reason}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid date for {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimtraderError {
    pub(crate) fn missing(field: &str) -> Self {
        SimtraderError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_config(section: &str, key: &str, reason: &str) -> Self {
        SimtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for SimtraderError {
    fn from(err: serde_json::Error) -> Self {
        SimtraderError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<csv::Error> for SimtraderError {
    fn from(err: csv::Error) -> Self {
        SimtraderError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<&SimtraderError> for std::process::ExitCode {
    fn from(err: &SimtraderError) -> Self {
        let code: u8 = match err {
            SimtraderError::Io(_) => 1,
            SimtraderError::ConfigParse { .. } | SimtraderError::ConfigInvalid { .. } => 2,
            SimtraderError::InvalidRange { .. }
            | SimtraderError::MissingField { .. }
            | SimtraderError::InvalidDate { .. } => 3,
            SimtraderError::Serialization { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_message() {
        let err = SimtraderError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reason: "end date is before start date".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date range 2024-02-01 to 2024-01-01: end date is before start date"
        );
    }

    #[test]
    fn missing_field_message() {
        let err = SimtraderError::missing("symbol");
        assert_eq!(err.to_string(), "missing required field: symbol");
    }

    #[test]
    fn json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SimtraderError = json_err.into();
        assert!(matches!(err, SimtraderError::Serialization { .. }));
    }

    fn code_of(err: &SimtraderError) -> String {
        format!("{:?}", std::process::ExitCode::from(err))
    }

    #[test]
    fn exit_codes_by_category() {
        use std::process::ExitCode;
        let io = SimtraderError::Io(std::io::Error::other("boom"));
        assert_eq!(code_of(&io), format!("{:?}", ExitCode::from(1)));
        let cfg = SimtraderError::invalid_config("backtest", "seed", "bad");
        assert_eq!(code_of(&cfg), format!("{:?}", ExitCode::from(2)));
        let req = SimtraderError::missing("strategy");
        assert_eq!(code_of(&req), format!("{:?}", ExitCode::from(3)));
        let ser = SimtraderError::Serialization {
            reason: "x".into(),
        };
        assert_eq!(code_of(&ser), format!("{:?}", ExitCode::from(4)));
    }
}
