use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Best-effort JSON-lines event log. A probe run never fails because its log
/// destination is unwritable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeLog {
    path: Option<PathBuf>,
}

impl ProbeLog {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.append(LogLevel::Info, event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.append(LogLevel::Warn, event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.append(LogLevel::Error, event, message);
    }

    pub fn append(&self, level: LogLevel, event: &str, message: &str) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        append_probe_log_line(path, level, event, message);
    }
}

pub fn append_probe_log_line(path: &Path, level: LogLevel, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": chrono::Utc::now().timestamp(),
        "level": level.as_str(),
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
