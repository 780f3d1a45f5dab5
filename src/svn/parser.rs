use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Line svn prints between log entries
pub const SEPARATOR: &str =
    "------------------------------------------------------------------------";

const CHANGED_PATHS_HEADER: &str = "Changed paths:";

/// Parse plain `svn log` output
///
/// Well-formed blocks become entries; each malformed block is skipped and
/// reported in [`LogParse::warnings`]. Empty input gives an empty result.
pub fn parse_log(output: &str) -> LogParse {
    let lines: Vec<&str> = output.lines().collect();
    let mut parsed = LogParse::default();
    let mut i = 0;

    while i < lines.len() {
        if is_separator(lines[i]) || lines[i].trim().is_empty() {
            i += 1;
            continue;
        }

        match parse_block(&lines, i) {
            Ok((entry, next)) => {
                parsed.entries.push(entry);
                i = next;
            }
            Err(reason) => {
                parsed.warnings.push(BlockWarning {
                    line: i + 1,
                    reason,
                });
                i = next_separator(&lines, i + 1);
            }
        }
    }

    parsed
}

fn is_separator(line: &str) -> bool {
    line.trim_end() == SEPARATOR
}

fn next_separator(lines: &[&str], from: usize) -> usize {
    (from..lines.len())
        .find(|&i| is_separator(lines[i]))
        .unwrap_or(lines.len())
}

/// Parse one block starting at its header line
///
/// Returns the entry and the index of the first line after the block.
fn parse_block(lines: &[&str], start: usize) -> Result<(LogEntry, usize), String> {
    let header = parse_header(lines[start])?;
    let mut i = start + 1;

    let mut paths = Vec::new();
    if lines.get(i).is_some_and(|l| l.trim_end() == CHANGED_PATHS_HEADER) {
        i += 1;
        while let Some(line) = lines.get(i) {
            if line.trim().is_empty() || is_separator(line) {
                break;
            }
            paths.push(parse_changed_path(line)?);
            i += 1;
        }
    }

    let message = match header.line_count {
        Some(count) => {
            match lines.get(i) {
                Some(line) if line.trim().is_empty() => i += 1,
                Some(line) => {
                    return Err(format!("expected blank line before message, found '{}'", line));
                }
                None => {
                    return Err(format!(
                        "r{}: truncated, expected {} message line(s)",
                        header.revision, count
                    ));
                }
            }

            let end = match i.checked_add(count) {
                Some(end) if end <= lines.len() => end,
                _ => {
                    return Err(format!(
                        "r{}: truncated, expected {} message line(s), found {}",
                        header.revision,
                        count,
                        lines.len() - i
                    ));
                }
            };

            let message = lines[i..end].join("\n");
            i = end;

            let trailing_blank = lines[i..].iter().all(|l| l.trim().is_empty());
            if let Some(line) = lines.get(i) {
                if !is_separator(line) && !trailing_blank {
                    return Err(format!(
                        "r{}: message longer than the declared {} line(s)",
                        header.revision, count
                    ));
                }
            }
            message
        }
        None => {
            // Quiet output has no message, only trailing blank lines
            while lines.get(i).is_some_and(|l| l.trim().is_empty()) {
                i += 1;
            }
            if let Some(line) = lines.get(i) {
                if !is_separator(line) {
                    return Err(format!(
                        "r{}: unexpected line '{}' in quiet entry",
                        header.revision, line
                    ));
                }
            }
            String::new()
        }
    };

    let entry = LogEntry {
        revision: header.revision,
        author: header.author,
        date: header.date,
        date_raw: header.date_raw,
        message,
        paths,
    };

    Ok((entry, i))
}

struct Header {
    revision: u64,
    author: String,
    date: Option<DateTime<FixedOffset>>,
    date_raw: String,
    line_count: Option<usize>,
}

/// Parse `r42 | alice | 2010-11-12 09:58:54 +0000 (Fri, 12 Nov 2010) | 2 lines`
fn parse_header(line: &str) -> Result<Header, String> {
    let parts: Vec<&str> = line.split(" | ").collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("malformed revision header '{}'", line));
    }

    let revision = parts[0]
        .trim()
        .strip_prefix('r')
        .and_then(|rev| rev.parse::<u64>().ok())
        .ok_or_else(|| format!("invalid revision marker '{}'", parts[0]))?;

    let author = match parts[1].trim() {
        "(no author)" => String::new(),
        author => author.to_string(),
    };

    let date_raw = parts[2].trim().to_string();
    let date = parse_date(&date_raw);

    let line_count = match parts.get(3) {
        Some(count) => Some(parse_line_count(count)?),
        None => None,
    };

    Ok(Header {
        revision,
        author,
        date,
        date_raw,
        line_count,
    })
}

/// `2010-11-12 09:58:54 +0000 (Fri, 12 Nov 2010)`, the suffix is optional
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let stamp = raw.split(" (").next().unwrap_or(raw).trim();
    DateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S %z").ok()
}

fn parse_line_count(field: &str) -> Result<usize, String> {
    let mut words = field.split_whitespace();
    let count = words
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| format!("invalid line count '{}'", field))?;

    match words.next() {
        Some("line") | Some("lines") => Ok(count),
        _ => Err(format!("invalid line count '{}'", field)),
    }
}

/// Parse `   A /trunk/b.txt (from /trunk/c.txt:41)`
fn parse_changed_path(line: &str) -> Result<ChangedPath, String> {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let action = chars
        .next()
        .and_then(ChangeAction::from_code)
        .ok_or_else(|| format!("invalid changed path '{}'", trimmed))?;

    let rest = chars.as_str();
    if !rest.starts_with(' ') {
        return Err(format!("invalid changed path '{}'", trimmed));
    }
    let rest = rest.trim_start();

    let (path, copy_from) = match rest.rfind(" (from ") {
        Some(pos) if rest.ends_with(')') => {
            let source = &rest[pos + " (from ".len()..rest.len() - 1];
            let copy = source
                .rsplit_once(':')
                .and_then(|(p, r)| r.parse::<u64>().ok().map(|rev| (p.to_string(), rev)))
                .ok_or_else(|| format!("invalid copy source '{}'", source))?;
            (&rest[..pos], Some(copy))
        }
        _ => (rest, None),
    };

    if path.is_empty() {
        return Err(format!("invalid changed path '{}'", trimmed));
    }

    let (copyfrom_path, copyfrom_rev) = match copy_from {
        Some((p, r)) => (Some(p), Some(r)),
        None => (None, None),
    };

    Ok(ChangedPath {
        action,
        path: path.to_string(),
        copyfrom_path,
        copyfrom_rev,
    })
}

/// Result of parsing a whole log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogParse {
    pub entries: Vec<LogEntry>,
    pub warnings: Vec<BlockWarning>,
}

/// A skipped log block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWarning {
    /// 1-based line number of the block header
    pub line: usize,
    pub reason: String,
}

/// One revision from svn log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub revision: u64,
    /// Empty when svn reports `(no author)`
    pub author: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub date_raw: String,
    pub message: String,
    pub paths: Vec<ChangedPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedPath {
    pub action: ChangeAction,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyfrom_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyfrom_rev: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "R")]
    Replaced,
}

impl ChangeAction {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(ChangeAction::Added),
            'D' => Some(ChangeAction::Deleted),
            'M' => Some(ChangeAction::Modified),
            'R' => Some(ChangeAction::Replaced),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ChangeAction::Added => 'A',
            ChangeAction::Deleted => 'D',
            ChangeAction::Modified => 'M',
            ChangeAction::Replaced => 'R',
        }
    }
}
