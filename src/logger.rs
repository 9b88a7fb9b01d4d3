// ABOUTME: Deployment log with emoji-tagged console lines and a best-effort log file.
// ABOUTME: Degrades to console-only when the file cannot be created; never returns errors.

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_LOG_DIR: &str = "/var/log";
const LOG_FILENAME: &str = "sitewright.log";

/// A destination for timestamped log lines.
pub trait LogSink: Send + Sync {
    /// Write one line. Errors are swallowed by the implementation.
    fn write_line(&self, line: &str);
}

/// Appends lines to an open log file, dropping any write failure.
struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Create (or truncate) the log file, restrict it to owner read/write,
    /// and open it for appending.
    fn create(path: &Path) -> std::io::Result<Self> {
        fs::write(path, "")?;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) {
        let mut file = self.file.lock();
        let _ = writeln!(file, "{line}");
    }
}

/// Deployment logger shared by all provisioning components.
///
/// Every message goes to stdout as `emoji message`; when a file sink is
/// available the same message is appended as `[timestamp] emoji message`.
#[derive(Clone)]
pub struct Logger {
    sink: Option<Arc<dyn LogSink>>,
    path: Option<PathBuf>,
}

impl Logger {
    /// Set up file-backed logging at the standard system location, falling
    /// back to the current directory and finally to console-only output.
    pub fn init() -> Self {
        let path = match fs::create_dir_all(DEFAULT_LOG_DIR) {
            Ok(()) => Path::new(DEFAULT_LOG_DIR).join(LOG_FILENAME),
            Err(_) => PathBuf::from(LOG_FILENAME),
        };
        Self::file_backed(&path)
    }

    /// File-backed logging at an explicit path, degrading to console-only
    /// if the file cannot be created.
    pub fn file_backed(path: &Path) -> Self {
        match FileSink::create(path) {
            Ok(sink) => Self {
                sink: Some(Arc::new(sink)),
                path: Some(path.to_path_buf()),
            },
            Err(e) => {
                eprintln!("Log file initialization failed, using console-only logging: {e}");
                Self::console_only()
            }
        }
    }

    pub fn console_only() -> Self {
        Self {
            sink: None,
            path: None,
        }
    }

    /// The log file path, if file-backed logging is active.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn log(&self, message: &str, emoji: &str) {
        println!("{emoji} {message}");

        if let Some(sink) = &self.sink {
            let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            sink.write_line(&format!("[{timestamp}] {emoji} {message}"));
        }
    }

    pub fn error(&self, message: &str) {
        self.log(message, "❌");
    }

    pub fn success(&self, message: &str) {
        self.log(message, "✅");
    }

    pub fn info(&self, message: &str) {
        self.log(message, "ℹ️");
    }

    pub fn warning(&self, message: &str) {
        self.log(message, "⚠️");
    }
}
