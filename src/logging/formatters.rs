use serde::Serialize;
use yansi::Paint;

use super::{FormatConfig, LogFormatter, Record, Severity};
use crate::error::Result;

/// Closed set of record renderers a sink can be paired with.
#[derive(Debug, Clone)]
pub enum Formatter {
    Plain(PlainFormatter),
    Json(JsonFormatter),
}

impl Formatter {
    pub fn plain(config: FormatConfig) -> Self {
        Formatter::Plain(PlainFormatter::new(config))
    }

    pub fn json(config: FormatConfig) -> Self {
        Formatter::Json(JsonFormatter::new(config))
    }

    pub(crate) fn select(json_format: bool, config: FormatConfig) -> Self {
        if json_format {
            Self::json(config)
        } else {
            Self::plain(config)
        }
    }

}

impl LogFormatter for Formatter {
    fn format(&self, record: &Record) -> Result<String> {
        match self {
            Formatter::Plain(f) => f.format(record),
            Formatter::Json(f) => f.format(record),
        }
    }
}

/// `<timestamp> [<LEVEL>] <name>: <message>`
#[derive(Debug, Clone)]
pub struct PlainFormatter {
    config: FormatConfig,
}

impl PlainFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    fn format_level(&self, severity: Severity) -> String {
        let name = severity.as_str();
        if !self.config.use_ansi {
            return name.to_string();
        }

        match severity {
            Severity::Debug => name.blue().to_string(),
            Severity::Info => name.green().to_string(),
            Severity::Warning => name.yellow().to_string(),
            Severity::Error => name.red().to_string(),
            Severity::Critical => name.red().bold().to_string(),
        }
    }
}

impl LogFormatter for PlainFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        Ok(format!(
            "{} [{}] {}: {}",
            self.config.render_timestamp(record.timestamp())?,
            self.format_level(record.severity()),
            record.logger_name(),
            record.message(),
        ))
    }
}

/// One JSON object per record. Only the fixed keys are written; caller
/// context stays on the record.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatConfig,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: &'static str,
    name: &'a str,
    message: &'a str,
    path: &'a str,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<JsonException<'a>>,
}

#[derive(Serialize)]
struct JsonException<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    message: &'a str,
}

impl JsonFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        let line = JsonLine {
            timestamp: self.config.render_timestamp(record.timestamp())?,
            level: record.severity().as_str(),
            name: record.logger_name(),
            message: record.message(),
            path: record.source_path(),
            line: record.source_line(),
            exception: record.error().map(|e| JsonException {
                kind: e.kind(),
                message: e.message(),
            }),
        };

        Ok(serde_json::to_string(&line)?)
    }
}
