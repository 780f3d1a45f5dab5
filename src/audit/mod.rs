pub mod logger;

pub use logger::AuditLogger;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Severity of a non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Notice,
    Warning,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Notice => f.write_str("notice"),
            NoticeLevel::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCode {
    /// One or more caller switches were not in the allowlist
    InvalidSwitch,
    /// A log block could not be decoded and was skipped
    MalformedLogBlock,
}

impl fmt::Display for NoticeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeCode::InvalidSwitch => f.write_str("INVALID-SWITCH"),
            NoticeCode::MalformedLogBlock => f.write_str("MALFORMED-LOG-BLOCK"),
        }
    }
}

/// A diagnostic that never aborts the operation that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub code: NoticeCode,
    pub message: String,
    pub params: BTreeMap<String, String>,
}

impl Notification {
    pub fn invalid_switch(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Notice,
            code: NoticeCode::InvalidSwitch,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn malformed_log_block(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            code: NoticeCode::MalformedLogBlock,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.level, self.code, self.message)
    }
}

/// Side channel for non-fatal diagnostics
///
/// Implementations must accept writes from several threads at once.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps notifications in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.notifications().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        let mut guard = match self.notifications.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(notification);
    }
}

/// Forwards notifications to `tracing` as warn events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        warn!(
            code = %notification.code,
            level = %notification.level,
            params = ?notification.params,
            "{}",
            notification.message
        );
    }
}

/// Sends every notification to each inner sink
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }
}

impl NotificationSink for FanoutSink {
    fn notify(&self, notification: Notification) {
        for sink in &self.sinks {
            sink.notify(notification.clone());
        }
    }
}
