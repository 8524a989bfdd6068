use crate::output::{Formatter, OutputResult};
use crate::record::GameRecord;

/// JSON rendering, pretty-printed by default
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &GameRecord) -> OutputResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        Ok(text)
    }
}
