use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::audit::{Notification, NotificationSink};
use crate::error::{Result, SvnError};
use crate::svn::fetch_mode::FetchMode;
use crate::svn::parser::{self, LogEntry};

/// Output of a log run, shaped by the fetch mode
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    /// Raw and Default: captured lines joined verbatim
    Text(String),
    /// Xml: the tool's markup, passed through untouched
    Xml(String),
    /// Array and Assoc: entries as key-accessed maps
    Keyed(Vec<Map<String, Value>>),
    /// Object: entries as field-accessible records
    Records(Vec<LogEntry>),
}

impl ParseResult {
    /// Text for Raw, Default and Xml results
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParseResult::Text(text) | ParseResult::Xml(text) => Some(text),
            _ => None,
        }
    }

    /// Number of entries for structured results, text length otherwise
    pub fn len(&self) -> usize {
        match self {
            ParseResult::Text(text) | ParseResult::Xml(text) => text.len(),
            ParseResult::Keyed(entries) => entries.len(),
            ParseResult::Records(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON view of the result, used by the CLI
    pub fn to_json(&self) -> Result<Value> {
        let value = match self {
            ParseResult::Text(text) | ParseResult::Xml(text) => Value::String(text.clone()),
            ParseResult::Keyed(entries) => {
                Value::Array(entries.iter().cloned().map(Value::Object).collect())
            }
            ParseResult::Records(entries) => serde_json::to_value(entries)
                .map_err(|e| SvnError::ParseError(e.to_string()))?,
        };
        Ok(value)
    }
}

/// Turns captured svn output into a [`ParseResult`]
pub struct OutputParser {
    sink: Arc<dyn NotificationSink>,
}

impl OutputParser {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub fn parse(&self, fetch_mode: FetchMode, lines: &[String]) -> Result<ParseResult> {
        let joined = lines.join("\n");

        let result = match fetch_mode {
            FetchMode::Raw | FetchMode::Default => ParseResult::Text(joined),
            FetchMode::Xml => ParseResult::Xml(joined),
            FetchMode::Array | FetchMode::Assoc => {
                let entries = self.parse_entries(&joined);
                let keyed = entries
                    .iter()
                    .map(to_map)
                    .collect::<Result<Vec<_>>>()?;
                ParseResult::Keyed(keyed)
            }
            FetchMode::Object => ParseResult::Records(self.parse_entries(&joined)),
        };

        debug!(%fetch_mode, size = result.len(), "parsed svn output");
        Ok(result)
    }

    fn parse_entries(&self, text: &str) -> Vec<LogEntry> {
        let parsed = parser::parse_log(text);

        for warning in &parsed.warnings {
            self.sink.notify(
                Notification::malformed_log_block(format!(
                    "skipped malformed log block at line {}: {}",
                    warning.line, warning.reason
                ))
                .with_param("line", warning.line.to_string()),
            );
        }

        parsed.entries
    }
}

fn to_map(entry: &LogEntry) -> Result<Map<String, Value>> {
    match serde_json::to_value(entry) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SvnError::ParseError(format!(
            "log entry serialized to non-object: {}",
            other
        ))),
        Err(e) => Err(SvnError::ParseError(e.to_string())),
    }
}
