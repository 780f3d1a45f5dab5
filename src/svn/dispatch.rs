use std::sync::Arc;
use std::time::Duration;

use crate::audit::{AuditLogger, NotificationSink};
use crate::config::Config;
use crate::error::{Result, SvnError};
use crate::svn::executor::{Invoker, SvnExecutor};
use crate::svn::log::LogCommand;
use crate::svn::options::RequestedOptions;
use crate::svn::output::ParseResult;

/// Everything an operation needs besides the caller's options
pub struct OperationContext {
    pub config: Config,
    pub invoker: Arc<dyn Invoker>,
    pub sink: Arc<dyn NotificationSink>,
    pub history: Option<Arc<AuditLogger>>,
}

impl OperationContext {
    /// Context that runs the real svn binary with the configured timeout
    pub fn from_config(config: Config, sink: Arc<dyn NotificationSink>) -> Self {
        let executor = SvnExecutor::with_timeout(Duration::from_secs(config.svn.timeout_seconds));
        Self {
            config,
            invoker: Arc::new(executor),
            sink,
            history: None,
        }
    }

    /// Record every executed command line in `history`
    pub fn with_history(mut self, history: Arc<AuditLogger>) -> Self {
        self.history = Some(history);
        self
    }
}

pub type Operation = fn(&OperationContext, &RequestedOptions) -> Result<ParseResult>;

/// Subcommands this crate can run, by name
const OPERATIONS: &[(&str, Operation)] = &[(LogCommand::NAME, run_log)];

fn run_log(ctx: &OperationContext, options: &RequestedOptions) -> Result<ParseResult> {
    let mut command = LogCommand::new(&ctx.config.svn.path, ctx.invoker.clone(), ctx.sink.clone());
    if let Some(history) = &ctx.history {
        command = command.with_history(history.clone());
    }
    command.run(options)
}

pub fn lookup(name: &str) -> Result<Operation> {
    OPERATIONS
        .iter()
        .find(|(op, _)| *op == name)
        .map(|(_, operation)| *operation)
        .ok_or_else(|| SvnError::OperationNotFound(name.to_string()))
}

/// Run the named operation
pub fn dispatch(
    name: &str,
    ctx: &OperationContext,
    options: &RequestedOptions,
) -> Result<ParseResult> {
    let operation = lookup(name)?;
    operation(ctx, options)
}

pub fn operation_names() -> impl Iterator<Item = &'static str> {
    OPERATIONS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemorySink;
    use crate::svn::command::Invocation;
    use crate::svn::executor::CommandOutput;
    use crate::svn::fetch_mode::FetchMode;

    struct EchoInvoker;

    impl Invoker for EchoInvoker {
        fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
            Ok(CommandOutput {
                lines: vec![invocation.command_line()],
                stderr: String::new(),
                exit_code: 0,
                success: true,
            })
        }
    }

    fn context() -> OperationContext {
        OperationContext {
            config: Config::default_config(),
            invoker: Arc::new(EchoInvoker),
            sink: Arc::new(MemorySink::new()),
            history: None,
        }
    }

    #[test]
    fn test_dispatch_log() {
        let result = dispatch("log", &context(), &RequestedOptions::new(FetchMode::Raw)).unwrap();
        assert_eq!(result.as_text(), Some("svn log --non-interactive"));
    }

    #[test]
    fn test_unknown_operation() {
        let result = dispatch("commit", &context(), &RequestedOptions::default());
        match result {
            Err(SvnError::OperationNotFound(name)) => assert_eq!(name, "commit"),
            other => panic!("expected OperationNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_records_history() {
        let temp = tempfile::TempDir::new().unwrap();
        let history = Arc::new(AuditLogger::with_path(temp.path().join("audit.log")).unwrap());
        let ctx = context().with_history(history.clone());

        dispatch("log", &ctx, &RequestedOptions::new(FetchMode::Raw)).unwrap();

        let content = std::fs::read_to_string(history.log_path()).unwrap();
        assert!(content.contains("svn log --non-interactive"));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(operation_names().collect::<Vec<_>>(), vec!["log"]);
    }
}
