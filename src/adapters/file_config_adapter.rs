//! INI file configuration adapter.
//!
//! Values are trimmed on lookup and a key with an empty value reads as absent,
//! so `seed =` behaves the same as leaving the line out.

use std::path::Path;

use configparser::ini::Ini;

use crate::domain::error::SimtraderError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    ini: Ini,
    source: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimtraderError> {
        let source = path.as_ref().display().to_string();
        let mut ini = Ini::new();
        ini.load(path.as_ref())
            .map_err(|reason| SimtraderError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        Ok(Self { ini, source })
    }

    pub fn from_string(content: &str) -> Result<Self, SimtraderError> {
        let source = "<inline>".to_string();
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| SimtraderError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        Ok(Self { ini, source })
    }

    /// An adapter with no sections; every lookup yields its default.
    pub fn empty() -> Self {
        Self {
            ini: Ini::new(),
            source: "<defaults>".to_string(),
        }
    }

    /// Where the values came from, for messages.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.value(section, key)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[backtest]
initial_capital = 250000.0
seed = 42

[price_path]
volatility = 0.02

[strategy]
indicator = RSI
comparison = below
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_double("backtest", "initial_capital", 0.0), 250000.0);
        assert_eq!(adapter.get_int("backtest", "seed", 0), 42);
        assert_eq!(adapter.get_double("price_path", "volatility", 0.0), 0.02);
        assert_eq!(
            adapter.get_string("strategy", "comparison"),
            Some("below".to_string())
        );
        assert_eq!(adapter.source(), "<inline>");
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nseed = 1\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn numeric_getters_fall_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[fees]\nstt_rate = abc\nchart = x\nnan = NaN\n").unwrap();
        assert_eq!(adapter.get_double("fees", "stt_rate", 0.5), 0.5);
        assert_eq!(adapter.get_double("fees", "missing", 0.25), 0.25);
        assert_eq!(adapter.get_double("fees", "nan", 0.1), 0.1);
        assert_eq!(adapter.get_int("fees", "chart", 50), 50);
    }

    #[test]
    fn has_key_ignores_blank_values() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nseed = 7\nsymbol =\n").unwrap();
        assert!(adapter.has_key("backtest", "seed"));
        assert!(!adapter.has_key("backtest", "symbol"));
        assert!(!adapter.has_key("backtest", "missing"));
        assert_eq!(adapter.get_int("backtest", "symbol", 3), 3);
    }

    #[test]
    fn empty_adapter_yields_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("backtest", "seed"), None);
        assert_eq!(adapter.get_double("backtest", "initial_capital", 1.0), 1.0);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[fees]\ngst_rate = 0.18\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_double("fees", "gst_rate", 0.0), 0.18);
        assert_eq!(adapter.source(), file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_a_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini")
            .err()
            .unwrap();
        match err {
            SimtraderError::ConfigParse { file, .. } => {
                assert_eq!(file, "/nonexistent/path/config.ini")
            }
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }
}
