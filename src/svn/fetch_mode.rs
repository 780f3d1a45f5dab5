use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the result requested from a log run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    Raw,
    Array,
    Assoc,
    Object,
    Xml,
    #[default]
    Default,
}

/// Whether `--xml` is forced on for each fetch mode
///
/// Array, Assoc and Object still parse the plain-text log format; the flag
/// is injected for them regardless.
const XML_POLICY: &[(FetchMode, bool)] = &[
    (FetchMode::Raw, false),
    (FetchMode::Array, true),
    (FetchMode::Assoc, true),
    (FetchMode::Object, true),
    (FetchMode::Xml, true),
    (FetchMode::Default, false),
];

impl FetchMode {
    pub const ALL: [FetchMode; 6] = [
        FetchMode::Raw,
        FetchMode::Array,
        FetchMode::Assoc,
        FetchMode::Object,
        FetchMode::Xml,
        FetchMode::Default,
    ];

    /// Look up the structured-output policy for this mode
    pub fn requires_xml(self) -> bool {
        XML_POLICY
            .iter()
            .find(|(mode, _)| *mode == self)
            .is_some_and(|(_, forced)| *forced)
    }

    /// Modes whose output is decomposed into log entries
    pub fn is_structured(self) -> bool {
        matches!(self, FetchMode::Array | FetchMode::Assoc | FetchMode::Object)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FetchMode::Raw => "raw",
            FetchMode::Array => "array",
            FetchMode::Assoc => "assoc",
            FetchMode::Object => "object",
            FetchMode::Xml => "xml",
            FetchMode::Default => "default",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FetchMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| format!("Unknown fetch mode: {}", s))
    }
}
