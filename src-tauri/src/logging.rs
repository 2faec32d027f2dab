use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use chrono::{Local, SecondsFormat};

use crate::runtime_paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogScope {
    Desktop,
    Startup,
    Backend,
    Shutdown,
}

impl LogScope {
    fn tag(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Startup => "startup",
            Self::Backend => "backend",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn format_log_line(scope: LogScope, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
        scope.tag(),
        message
    )
}

pub(crate) fn append_line(log_path: &Path, line: &str) -> Result<(), String> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open log {}: {}", log_path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write log {}: {}", log_path.display(), error))
}

fn append_scoped_log(scope: LogScope, message: &str) {
    let line = format_log_line(scope, message);
    eprintln!("{line}");

    let Some(log_path) = runtime_paths::desktop_log_path(runtime_paths::default_root_dir()) else {
        return;
    };
    if let Err(error) = append_line(&log_path, &line) {
        eprintln!("{error}");
    }
}

pub(crate) fn append_desktop_log(message: &str) {
    append_scoped_log(LogScope::Desktop, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_scoped_log(LogScope::Startup, message);
}

pub(crate) fn append_backend_log(message: &str) {
    append_scoped_log(LogScope::Backend, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_scoped_log(LogScope::Shutdown, message);
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn format_log_line_includes_scope_and_message() {
        let line = format_log_line(LogScope::Backend, "backend reachable");
        assert!(line.starts_with('['));
        assert!(line.contains("] [backend] backend reachable"));
    }

    #[test]
    fn append_line_creates_parent_dirs_and_appends() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let log_path = temp.path().join("logs").join("desktop.log");

        append_line(&log_path, "first").expect("append first line");
        append_line(&log_path, "second").expect("append second line");

        let content = fs::read_to_string(&log_path).expect("read log");
        assert_eq!(content, "first\nsecond\n");
    }
}
