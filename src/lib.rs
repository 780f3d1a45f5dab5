pub mod audit;
pub mod config;
pub mod error;
pub mod security;
pub mod svn;

// Re-export commonly used types for convenience
pub use audit::{MemorySink, Notification, NotificationSink, TracingSink};
pub use config::Config;
pub use error::{AppError, Result, SvnError};
pub use svn::{FetchMode, LogCommand, LogEntry, ParseResult, RequestedOptions, SwitchValue};
