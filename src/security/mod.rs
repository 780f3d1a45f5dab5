pub mod validator;

pub use validator::{BuiltSwitches, CommandRequirements, SwitchValidator};

use std::fmt;

/// How a switch is rendered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    /// `--name`, present only when the value is `true`
    BoolLong,
    /// `-n`, present only when the value is `true`
    BoolShort,
    /// `--name value`
    ValueLong,
    /// `-n value`
    ValueShort,
}

impl SwitchKind {
    pub fn takes_value(self) -> bool {
        matches!(self, SwitchKind::ValueLong | SwitchKind::ValueShort)
    }
}

/// Canonical identifier of every switch accepted by `svn log`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Switch {
    R,
    Q,
    V,
    Revision,
    Quiet,
    Verbose,
    Targets,
    StopOnCopy,
    Incremental,
    Xml,
    Username,
    Password,
    NoAuthCache,
    NonInteractive,
    ConfigDir,
    Limit,
}

/// Stands in for secret switch values in logs and notices
pub const REDACTED: &str = "********";

/// Allowlist of `svn log` switches
///
/// Every entry here must resolve through [`Switch::lookup`]. Adding a switch
/// means adding a variant, a row here and its kind.
pub const ALLOWED_LOG_SWITCHES: &[Switch] = &[
    Switch::R,
    Switch::Q,
    Switch::V,
    Switch::Revision,
    Switch::Quiet,
    Switch::Verbose,
    Switch::Targets,
    Switch::StopOnCopy,
    Switch::Incremental,
    Switch::Xml,
    Switch::Username,
    Switch::Password,
    Switch::NoAuthCache,
    Switch::NonInteractive,
    Switch::ConfigDir,
    Switch::Limit,
];

impl Switch {
    /// Canonical switch name, without leading dashes
    pub fn name(self) -> &'static str {
        match self {
            Switch::R => "r",
            Switch::Q => "q",
            Switch::V => "v",
            Switch::Revision => "revision",
            Switch::Quiet => "quiet",
            Switch::Verbose => "verbose",
            Switch::Targets => "targets",
            Switch::StopOnCopy => "stop-on-copy",
            Switch::Incremental => "incremental",
            Switch::Xml => "xml",
            Switch::Username => "username",
            Switch::Password => "password",
            Switch::NoAuthCache => "no-auth-cache",
            Switch::NonInteractive => "non-interactive",
            Switch::ConfigDir => "config-dir",
            Switch::Limit => "limit",
        }
    }

    pub fn kind(self) -> SwitchKind {
        match self {
            Switch::R => SwitchKind::ValueShort,
            Switch::Q | Switch::V => SwitchKind::BoolShort,
            Switch::Revision
            | Switch::Targets
            | Switch::Username
            | Switch::Password
            | Switch::ConfigDir
            | Switch::Limit => SwitchKind::ValueLong,
            Switch::Quiet
            | Switch::Verbose
            | Switch::StopOnCopy
            | Switch::Incremental
            | Switch::Xml
            | Switch::NoAuthCache
            | Switch::NonInteractive => SwitchKind::BoolLong,
        }
    }

    /// Alternative spellings accepted for this switch
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Switch::StopOnCopy => &["stop_on_copy"],
            Switch::NoAuthCache => &["no_auth_cache"],
            Switch::NonInteractive => &["non_interactive"],
            Switch::ConfigDir => &["config_dir"],
            _ => &[],
        }
    }

    /// Resolve a caller-supplied name (canonical or alias) to a switch
    pub fn lookup(name: &str) -> Option<Switch> {
        ALLOWED_LOG_SWITCHES
            .iter()
            .copied()
            .find(|switch| switch.name() == name || switch.aliases().contains(&name))
    }

    /// The command-line token for this switch, e.g. `--verbose` or `-r`
    pub fn token(self) -> String {
        match self.kind() {
            SwitchKind::BoolLong | SwitchKind::ValueLong => format!("--{}", self.name()),
            SwitchKind::BoolShort | SwitchKind::ValueShort => format!("-{}", self.name()),
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
