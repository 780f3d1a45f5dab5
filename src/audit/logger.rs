use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use chrono::Utc;
use tracing::error;

use crate::audit::{Notification, NotificationSink};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only file sink for notices and executed commands
pub struct AuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new AuditLogger with the default log path
    pub fn new() -> std::io::Result<Self> {
        Self::with_path(Self::default_log_path()?)
    }

    /// Create an AuditLogger with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the default log path: ~/.config/svnlog/audit.log
    pub fn default_log_path() -> std::io::Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "HOME environment variable not set"
            ))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("svnlog")
            .join("audit.log"))
    }

    /// Log an executed svn command
    pub fn log_command(&self, command: &str, exit_code: i32) -> std::io::Result<()> {
        let entry = format!(
            "[{}] [{}] [exit:{}] {}\n",
            Utc::now().to_rfc3339(),
            current_user(),
            exit_code,
            command
        );
        self.append(&entry)
    }

    /// Log a notification with its parameters
    pub fn log_notification(&self, notification: &Notification) -> std::io::Result<()> {
        let params: Vec<String> = notification
            .params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, value))
            .collect();

        let mut entry = format!(
            "[{}] [{}] {}",
            Utc::now().to_rfc3339(),
            current_user(),
            notification
        );
        if !params.is_empty() {
            entry.push(' ');
            entry.push_str(&params.join(" "));
        }
        self.append(&entry)
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.rotate_if_needed()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(entry.as_bytes())?;
        if !entry.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.flush()?;

        Ok(())
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // audit.log -> audit.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl NotificationSink for AuditLogger {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.log_notification(&notification) {
            error!(path = %self.log_path.display(), "failed to write audit log: {}", e);
        }
    }
}

fn current_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}
