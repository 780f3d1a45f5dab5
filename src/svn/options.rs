use crate::svn::fetch_mode::FetchMode;
use std::fmt;

/// Value supplied by the caller for one switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchValue {
    Bool(bool),
    Text(String),
}

impl SwitchValue {
    /// True only for `Bool(true)`; text never counts as enabled
    pub fn is_true(&self) -> bool {
        matches!(self, SwitchValue::Bool(true))
    }
}

impl fmt::Display for SwitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchValue::Bool(b) => write!(f, "{}", b),
            SwitchValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SwitchValue {
    fn from(value: bool) -> Self {
        SwitchValue::Bool(value)
    }
}

impl From<&str> for SwitchValue {
    fn from(value: &str) -> Self {
        SwitchValue::Text(value.to_string())
    }
}

impl From<String> for SwitchValue {
    fn from(value: String) -> Self {
        SwitchValue::Text(value)
    }
}

impl From<u64> for SwitchValue {
    fn from(value: u64) -> Self {
        SwitchValue::Text(value.to_string())
    }
}

impl From<i64> for SwitchValue {
    fn from(value: i64) -> Self {
        SwitchValue::Text(value.to_string())
    }
}

/// Switches, positional arguments and fetch mode requested by the caller
///
/// Switch order is insertion order; setting a name twice replaces the
/// earlier value in place, so the built invocation stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedOptions {
    switches: Vec<(String, SwitchValue)>,
    args: Vec<String>,
    fetch_mode: FetchMode,
}

impl RequestedOptions {
    pub fn new(fetch_mode: FetchMode) -> Self {
        Self {
            fetch_mode,
            ..Self::default()
        }
    }

    /// Builder-style switch setter
    pub fn switch(mut self, name: impl Into<String>, value: impl Into<SwitchValue>) -> Self {
        self.set_switch(name, value);
        self
    }

    /// Builder-style positional argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn set_switch(&mut self, name: impl Into<String>, value: impl Into<SwitchValue>) {
        let name = name.into();
        let value = value.into();
        match self.switches.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.switches.push((name, value)),
        }
    }

    pub fn set_fetch_mode(&mut self, fetch_mode: FetchMode) {
        self.fetch_mode = fetch_mode;
    }

    pub fn switches(&self) -> &[(String, SwitchValue)] {
        &self.switches
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }
}
