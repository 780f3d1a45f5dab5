pub mod command;
pub mod dispatch;
pub mod executor;
pub mod fetch_mode;
pub mod log;
pub mod options;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use command::{Invocation, InvocationAssembler};
pub use dispatch::{OperationContext, dispatch};
pub use executor::{CommandOutput, Invoker, SvnExecutor};
pub use fetch_mode::FetchMode;
pub use log::LogCommand;
pub use options::{RequestedOptions, SwitchValue};
pub use output::{OutputParser, ParseResult};
pub use parser::{BlockWarning, ChangeAction, ChangedPath, LogEntry, LogParse, parse_log};
