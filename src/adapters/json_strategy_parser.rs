//! Offline strategy parser for the structured JSON strategy shape.
//!
//! Accepts the same document a language-model parser is asked to return:
//!
//! ```json
//! {"entry": {"indicator": "RSI", "condition": "below", "value": 30},
//!  "exit": {"profitTarget": 5, "stopLoss": 2}}
//! ```
//!
//! Markdown code fences around the document are tolerated. Anything else is
//! reported as unparsed.

use crate::domain::strategy::StructuredStrategy;
use crate::ports::strategy_parser_port::StrategyParser;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStrategyParser;

impl JsonStrategyParser {
    pub fn new() -> Self {
        JsonStrategyParser
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop an info string such as `json` on the opening fence
    let body = body.split_once('\n').map(|(_, rest)| rest).unwrap_or(body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

impl StrategyParser for JsonStrategyParser {
    fn parse(&self, strategy_text: &str) -> Option<StructuredStrategy> {
        let body = strip_code_fence(strategy_text);
        if !body.starts_with('{') {
            return None;
        }
        match serde_json::from_str::<StructuredStrategy>(body) {
            Ok(strategy) => Some(strategy),
            Err(e) => {
                log::warn!("strategy JSON rejected: {e}");
                None
            }
        }
    }
}
