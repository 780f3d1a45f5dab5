use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::debug;

use svnlog::audit::{AuditLogger, FanoutSink, NotificationSink, TracingSink};
use svnlog::error::{AppError, AppResult};
use svnlog::svn::{OperationContext, ParseResult, dispatch};
use svnlog::{Config, FetchMode, RequestedOptions, SwitchValue};

/// Run `svn log` with validated switches and structured output
#[derive(Debug, Parser)]
#[command(name = "svnlog", version, about)]
struct Args {
    /// raw, default, xml, array, assoc or object
    #[arg(short = 'm', long)]
    fetch_mode: Option<FetchMode>,

    /// Path to the svn binary
    #[arg(long)]
    svn_path: Option<PathBuf>,

    /// Config file (default: ~/.config/svnlog/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Switch as NAME or NAME=VALUE, e.g. `-s verbose -s limit=10`
    #[arg(short = 's', long = "switch", value_name = "NAME[=VALUE]")]
    switches: Vec<String>,

    /// Log level filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Repository URL or working copy path, then optional paths
    args: Vec<String>,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> AppResult<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };
    if let Some(path) = args.svn_path {
        config.svn.path = path;
    }
    debug!(?config, "loaded configuration");

    let fetch_mode = args.fetch_mode.unwrap_or(config.output.fetch_mode);
    let mut options = RequestedOptions::new(fetch_mode);
    for raw in &args.switches {
        let (name, value) = parse_switch(raw);
        options.set_switch(name, value);
    }
    for arg in args.args {
        options = options.arg(arg);
    }

    let audit = open_audit_log(&config)?;
    let sink = build_sink(audit.clone());
    let mut ctx = OperationContext::from_config(config, sink);
    if let Some(logger) = audit {
        ctx = ctx.with_history(logger);
    }
    let result = dispatch("log", &ctx, &options)?;

    match result {
        ParseResult::Text(text) | ParseResult::Xml(text) => println!("{}", text),
        structured => {
            let json = structured.to_json()?;
            let pretty = serde_json::to_string_pretty(&json)
                .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
            println!("{}", pretty);
        }
    }

    Ok(())
}

/// Split a `NAME[=VALUE]` argument; a bare name or `=true` enables a flag
fn parse_switch(raw: &str) -> (String, SwitchValue) {
    match raw.split_once('=') {
        None => (raw.to_string(), SwitchValue::Bool(true)),
        Some((name, "true")) => (name.to_string(), SwitchValue::Bool(true)),
        Some((name, "false")) => (name.to_string(), SwitchValue::Bool(false)),
        Some((name, value)) => (name.to_string(), SwitchValue::from(value)),
    }
}

fn open_audit_log(config: &Config) -> AppResult<Option<Arc<AuditLogger>>> {
    if !config.audit.log_notices {
        return Ok(None);
    }

    let logger = match &config.audit.log_path {
        Some(path) => AuditLogger::with_path(path)?,
        None => AuditLogger::new()?,
    };
    Ok(Some(Arc::new(logger)))
}

fn build_sink(audit: Option<Arc<AuditLogger>>) -> Arc<dyn NotificationSink> {
    match audit {
        Some(logger) => {
            let console: Arc<dyn NotificationSink> = Arc::new(TracingSink);
            let audit: Arc<dyn NotificationSink> = logger;
            Arc::new(FanoutSink::new(vec![console, audit]))
        }
        None => Arc::new(TracingSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        assert_eq!(parse_switch("verbose"), ("verbose".to_string(), SwitchValue::Bool(true)));
        assert_eq!(parse_switch("quiet=false"), ("quiet".to_string(), SwitchValue::Bool(false)));
        assert_eq!(
            parse_switch("revision=10:20"),
            ("revision".to_string(), SwitchValue::Text("10:20".to_string()))
        );
        assert_eq!(
            parse_switch("config-dir=/a=b"),
            ("config-dir".to_string(), SwitchValue::Text("/a=b".to_string()))
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "svnlog", "-m", "assoc", "-s", "verbose", "-s", "limit=5", "file:///repo",
        ]);
        assert_eq!(args.fetch_mode, Some(FetchMode::Assoc));
        assert_eq!(args.switches, vec!["verbose", "limit=5"]);
        assert_eq!(args.args, vec!["file:///repo"]);
    }
}
