#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use svnlog::MemorySink;
use svnlog::error::Result;
use svnlog::svn::parser::SEPARATOR;
use svnlog::svn::{CommandOutput, Invocation, Invoker, LogCommand};

/// Invoker that returns canned lines and remembers what it was asked to run
pub struct MockInvoker {
    lines: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockInvoker {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// argv of every invocation seen, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Invoker for MockInvoker {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.argv());
        Ok(CommandOutput {
            lines: self.lines.clone(),
            stderr: String::new(),
            exit_code: 0,
            success: true,
        })
    }
}

/// A log command wired to a mock invoker and an in-memory sink
pub fn log_command(lines: Vec<String>) -> (LogCommand, Arc<MockInvoker>, Arc<MemorySink>) {
    let invoker = Arc::new(MockInvoker::new(lines));
    let sink = Arc::new(MemorySink::new());
    let command = LogCommand::new("/usr/bin/svn", invoker.clone(), sink.clone());
    (command, invoker, sink)
}

/// One well-formed log block, without separators
pub fn log_block(revision: u64, author: &str, message: &[&str]) -> String {
    let count = message.len();
    let unit = if count == 1 { "line" } else { "lines" };
    format!(
        "r{} | {} | 2015-06-07 08:09:10 +0000 (Sun, 07 Jun 2015) | {} {}\n\n{}",
        revision,
        author,
        count,
        unit,
        message.join("\n")
    )
}

/// Blocks joined the way svn prints them
pub fn log_output(blocks: &[String]) -> Vec<String> {
    let mut text = String::from(SEPARATOR);
    for block in blocks {
        text.push('\n');
        text.push_str(block);
        text.push('\n');
        text.push_str(SEPARATOR);
    }
    text.lines().map(String::from).collect()
}

pub fn count_token(argv: &[String], token: &str) -> usize {
    argv.iter().filter(|a| *a == token).count()
}
