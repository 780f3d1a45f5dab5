use std::path::{Path, PathBuf};
use tracing::debug;

use crate::security::{BuiltSwitches, REDACTED, Switch};
use crate::svn::fetch_mode::FetchMode;

/// A fully assembled svn command, ready for execution
///
/// Only [`InvocationAssembler`] creates these; nothing mutates one after
/// assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    subcommand: String,
    switches: Vec<String>,
    args: Vec<String>,
}

impl Invocation {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    pub fn switches(&self) -> &[String] {
        &self.switches
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments passed to the program, without the program itself
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.switches.len() + self.args.len());
        argv.push(self.subcommand.clone());
        argv.extend(self.switches.iter().cloned());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Space-joined command line, exactly as executed
    pub fn command_line(&self) -> String {
        self.join(self.argv())
    }

    /// Command line with the `--password` value masked
    ///
    /// Use this for logs, audit history and error messages.
    pub fn redacted_command_line(&self) -> String {
        let mut argv = self.argv();
        let mut parts = argv.iter_mut();
        while let Some(part) = parts.next() {
            if *part == Switch::Password.token() {
                if let Some(value) = parts.next() {
                    *value = REDACTED.to_string();
                }
            }
        }
        self.join(argv)
    }

    fn join(&self, argv: Vec<String>) -> String {
        let mut line = self.program.display().to_string();
        for part in argv {
            line.push(' ');
            line.push_str(&part);
        }
        line
    }
}

/// Combines program, subcommand, switches and arguments into an [`Invocation`]
#[derive(Debug, Clone)]
pub struct InvocationAssembler {
    program: PathBuf,
    subcommand: &'static str,
}

impl InvocationAssembler {
    pub fn new<P: AsRef<Path>>(program: P, subcommand: &'static str) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            subcommand,
        }
    }

    /// Assemble the invocation
    ///
    /// `--xml` is appended when the fetch mode requires it and the caller
    /// did not already ask for it. Positional arguments keep caller order.
    pub fn assemble(
        &self,
        mut switches: BuiltSwitches,
        args: &[String],
        fetch_mode: FetchMode,
    ) -> Invocation {
        if fetch_mode.requires_xml() {
            switches.ensure(Switch::Xml);
        }

        let invocation = Invocation {
            program: self.program.clone(),
            subcommand: self.subcommand.to_string(),
            switches: switches.tokens().to_vec(),
            args: args.to_vec(),
        };

        debug!(command = %invocation.redacted_command_line(), %fetch_mode, "assembled invocation");
        invocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemorySink;
    use crate::security::SwitchValidator;
    use crate::svn::options::RequestedOptions;
    use std::sync::Arc;

    fn assemble(options: &RequestedOptions) -> Invocation {
        let validator = SwitchValidator::new("log", Arc::new(MemorySink::new()));
        let assembler = InvocationAssembler::new("/usr/bin/svn", "log");
        assembler.assemble(validator.build(options), options.args(), options.fetch_mode())
    }

    fn count(invocation: &Invocation, token: &str) -> usize {
        invocation.switches().iter().filter(|s| *s == token).count()
    }

    #[test]
    fn test_raw_command_line() {
        let options = RequestedOptions::new(FetchMode::Raw)
            .switch("verbose", true)
            .arg("svn://svn.example.com/repos/TestProject");

        assert_eq!(
            assemble(&options).command_line(),
            "/usr/bin/svn log --verbose --non-interactive svn://svn.example.com/repos/TestProject"
        );
    }

    #[test]
    fn test_structured_modes_inject_xml_once() {
        for mode in [FetchMode::Array, FetchMode::Assoc, FetchMode::Object, FetchMode::Xml] {
            let invocation = assemble(&RequestedOptions::new(mode));
            assert_eq!(count(&invocation, "--xml"), 1, "mode {}", mode);
        }
    }

    #[test]
    fn test_caller_xml_not_duplicated() {
        let invocation = assemble(&RequestedOptions::new(FetchMode::Assoc).switch("xml", true));
        assert_eq!(count(&invocation, "--xml"), 1);
        assert_eq!(invocation.switches(), ["--xml", "--non-interactive"]);
    }

    #[test]
    fn test_text_modes_do_not_inject_xml() {
        for mode in [FetchMode::Raw, FetchMode::Default] {
            let invocation = assemble(&RequestedOptions::new(mode));
            assert_eq!(count(&invocation, "--xml"), 0, "mode {}", mode);
        }
    }

    #[test]
    fn test_args_keep_caller_order() {
        let options = RequestedOptions::new(FetchMode::Raw)
            .arg("file:///repo")
            .arg("trunk/a.txt")
            .arg("trunk/b.txt");

        let invocation = assemble(&options);
        assert_eq!(invocation.args(), ["file:///repo", "trunk/a.txt", "trunk/b.txt"]);
        assert_eq!(
            invocation.argv(),
            vec!["log", "--non-interactive", "file:///repo", "trunk/a.txt", "trunk/b.txt"]
        );
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let options = RequestedOptions::new(FetchMode::Assoc)
            .switch("revision", "10:20")
            .switch("v", true)
            .switch("bogus", true)
            .arg("file:///repo");

        let first = assemble(&options);
        let second = assemble(&options);
        assert_eq!(first, second);
        assert_eq!(first.command_line(), second.command_line());
    }

    #[test]
    fn test_password_redacted_for_display() {
        let options = RequestedOptions::new(FetchMode::Raw)
            .switch("username", "me")
            .switch("password", "hunter2")
            .arg("file:///repo");
        let invocation = assemble(&options);

        assert_eq!(
            invocation.redacted_command_line(),
            "/usr/bin/svn log --username me --password ******** --non-interactive file:///repo"
        );
        assert!(invocation.command_line().contains("--password hunter2"));
        assert!(invocation.argv().contains(&"hunter2".to_string()));
    }

    #[test]
    fn test_redaction_leaves_other_commands_alone() {
        let invocation = assemble(&RequestedOptions::new(FetchMode::Raw).switch("v", true));
        assert_eq!(invocation.redacted_command_line(), invocation.command_line());
    }

    #[test]
    fn test_value_with_spaces_stays_one_argument() {
        let options = RequestedOptions::new(FetchMode::Raw).switch("config-dir", "/home/me/my svn");
        let invocation = assemble(&options);
        assert_eq!(
            invocation.argv(),
            vec!["log", "--config-dir", "/home/me/my svn", "--non-interactive"]
        );
    }
}
