use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::audit::{Notification, NotificationSink};
use crate::error::{Result, SvnError};
use crate::security::{REDACTED, Switch, SwitchKind};
use crate::svn::options::{RequestedOptions, SwitchValue};

/// Switch tokens accepted for a command, plus the names that were rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSwitches {
    tokens: Vec<String>,
    present: Vec<Switch>,
    invalid: Vec<String>,
}

impl BuiltSwitches {
    /// Argument tokens, in the order they will be passed to svn
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Caller-supplied names that are not in the allowlist
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// Whether a token for this switch was emitted
    pub fn contains(&self, switch: Switch) -> bool {
        self.present.contains(&switch)
    }

    /// Append a boolean switch unless it is already present
    pub fn ensure(&mut self, switch: Switch) {
        if !self.contains(switch) {
            self.tokens.push(switch.token());
            self.present.push(switch);
        }
    }
}

impl fmt::Display for BuiltSwitches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Minimum arguments and switches a subcommand needs before it may run
#[derive(Debug, Clone, Default)]
pub struct CommandRequirements {
    pub min_args: usize,
    /// Each group is satisfied by any one of its switches
    pub required_switches: Vec<Vec<Switch>>,
}

impl CommandRequirements {
    pub fn check(&self, options: &RequestedOptions) -> Result<()> {
        if options.args().len() < self.min_args {
            return Err(SvnError::RequirementsNotMet(format!(
                "at least {} argument(s) required, {} given",
                self.min_args,
                options.args().len()
            )));
        }

        for group in &self.required_switches {
            let satisfied = options
                .switches()
                .iter()
                .filter_map(|(name, _)| Switch::lookup(name))
                .any(|switch| group.contains(&switch));

            if !satisfied {
                let names: Vec<&str> = group.iter().map(|s| s.name()).collect();
                return Err(SvnError::RequirementsNotMet(format!(
                    "missing required switch: {}",
                    names.join("|")
                )));
            }
        }

        Ok(())
    }
}

/// Validates caller switches against the allowlist and formats them
pub struct SwitchValidator {
    command: &'static str,
    sink: Arc<dyn NotificationSink>,
}

impl SwitchValidator {
    pub fn new(command: &'static str, sink: Arc<dyn NotificationSink>) -> Self {
        Self { command, sink }
    }

    /// Build the switch tokens for the requested options
    ///
    /// Unknown switches are dropped and reported once through the sink.
    /// `--non-interactive` is always present exactly once in the result.
    pub fn build(&self, options: &RequestedOptions) -> BuiltSwitches {
        let mut built = BuiltSwitches {
            tokens: Vec::new(),
            present: Vec::new(),
            invalid: Vec::new(),
        };

        for (name, value) in options.switches() {
            let Some(switch) = Switch::lookup(name) else {
                built.invalid.push(name.clone());
                continue;
            };

            if built.contains(switch) {
                continue;
            }

            match (switch.kind(), value) {
                (SwitchKind::ValueLong | SwitchKind::ValueShort, SwitchValue::Text(text)) => {
                    built.tokens.push(switch.token());
                    built.tokens.push(text.clone());
                    built.present.push(switch);
                }
                (SwitchKind::ValueLong | SwitchKind::ValueShort, SwitchValue::Bool(_)) => {
                    debug!(switch = %switch, "value switch given a boolean, skipping");
                }
                (SwitchKind::BoolLong | SwitchKind::BoolShort, value) => {
                    if value.is_true() {
                        built.tokens.push(switch.token());
                        built.present.push(switch);
                    }
                }
            }
        }

        built.ensure(Switch::NonInteractive);

        if !built.invalid.is_empty() {
            self.report_invalid(&built.invalid, options);
        }

        built
    }

    fn report_invalid(&self, invalid: &[String], options: &RequestedOptions) {
        let list = invalid.join(", ");
        let message = if invalid.len() == 1 {
            format!("svn {}: switch {} is invalid and was ignored", self.command, list)
        } else {
            format!("svn {}: switches {} are invalid and were ignored", self.command, list)
        };

        let switches: Vec<String> = options
            .switches()
            .iter()
            .map(|(name, value)| match Switch::lookup(name) {
                Some(Switch::Password) => format!("{}={}", name, REDACTED),
                _ => format!("{}={}", name, value),
            })
            .collect();

        self.sink.notify(
            Notification::invalid_switch(message)
                .with_param("command", self.command)
                .with_param("list", list)
                .with_param("switches", switches.join(" ")),
        );
    }
}
