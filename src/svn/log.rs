use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::{AuditLogger, NotificationSink};
use crate::error::Result;
use crate::security::{CommandRequirements, SwitchValidator};
use crate::svn::command::{Invocation, InvocationAssembler};
use crate::svn::executor::Invoker;
use crate::svn::options::RequestedOptions;
use crate::svn::output::{OutputParser, ParseResult};

/// The `svn log` subcommand
///
/// Validates switches, assembles the invocation, runs it through the
/// [`Invoker`] and shapes the output according to the fetch mode.
pub struct LogCommand {
    svn_path: PathBuf,
    requirements: CommandRequirements,
    validator: SwitchValidator,
    assembler: InvocationAssembler,
    output_parser: OutputParser,
    invoker: Arc<dyn Invoker>,
    history: Option<Arc<AuditLogger>>,
}

impl LogCommand {
    pub const NAME: &'static str = "log";

    pub fn new<P: AsRef<Path>>(
        svn_path: P,
        invoker: Arc<dyn Invoker>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let svn_path = svn_path.as_ref().to_path_buf();
        Self {
            assembler: InvocationAssembler::new(&svn_path, Self::NAME),
            validator: SwitchValidator::new(Self::NAME, sink.clone()),
            output_parser: OutputParser::new(sink),
            requirements: CommandRequirements::default(),
            svn_path,
            invoker,
            history: None,
        }
    }

    pub fn with_requirements(mut self, requirements: CommandRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Record every executed command line in this audit log
    pub fn with_history(mut self, history: Arc<AuditLogger>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn svn_path(&self) -> &Path {
        &self.svn_path
    }

    /// Check requirements and assemble the invocation, without running it
    pub fn prepare(&self, options: &RequestedOptions) -> Result<Invocation> {
        self.requirements.check(options)?;

        let switches = self.validator.build(options);
        Ok(self
            .assembler
            .assemble(switches, options.args(), options.fetch_mode()))
    }

    /// Prepare, execute and parse
    pub fn run(&self, options: &RequestedOptions) -> Result<ParseResult> {
        let invocation = self.prepare(options)?;
        let command = invocation.redacted_command_line();

        let result = self.invoker.invoke(&invocation);
        self.record(&command, result.as_ref().map_or(-1, |output| output.exit_code));
        let output = result?;

        info!(%command, lines = output.lines.len(), "svn log finished");
        self.output_parser.parse(options.fetch_mode(), &output.lines)
    }

    fn record(&self, command: &str, exit_code: i32) {
        let Some(history) = &self.history else {
            return;
        };

        if let Err(e) = history.log_command(command, exit_code) {
            warn!("failed to record command history: {}", e);
        }
    }
}
