//! Replay and editor-session log.
//!
//! Nothing is written until [`init`] or [`init_at`] opens a file, so library
//! callers and unit tests get silent `log_*!` macros. The CLI opens one with
//! `--log FILE` or `--verbose`; the default location is
//! `<data dir>/tilepaint/tilepaint.log` (`%APPDATA%`, `~/Library/Application
//! Support` or `$XDG_DATA_HOME` / `~/.local/share`). Each run truncates it.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

struct Sink {
    path: PathBuf,
    file: Mutex<File>,
}

static SINK: OnceLock<Sink> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of the open log, if any.
pub fn log_path() -> Option<&'static Path> {
    SINK.get().map(|s| s.path.as_path())
}

pub fn is_initialized() -> bool {
    SINK.get().is_some()
}

fn append(line: &str) {
    if let Some(sink) = SINK.get()
        && let Ok(mut file) = sink.file.lock()
    {
        // I/O errors are dropped; a full disk must not stop a replay.
        let _ = writeln!(file, "{}", line);
    }
}

/// Record one message. No-op before initialisation.
pub fn write(level: Level, msg: &str) {
    if is_initialized() {
        append(&format_line(level, msg, unix_seconds()));
    }
}

/// `[HH:MM:SS] [LEVEL] message`, clock in UTC.
fn format_line(level: Level, msg: &str, secs: u64) -> String {
    let (h, m, s) = ((secs % 86_400) / 3600, (secs % 3600) / 60, secs % 60);
    format!("[{:02}:{:02}:{:02}] [{}] {}", h, m, s, level, msg)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*));
    };
}

/// Open the log at the per-user default location.
pub fn init() {
    init_at(&default_log_path());
}

/// Open (truncating) the log at `path` and chain a panic hook that records
/// the panic before the previous hook runs. First successful call wins.
pub fn init_at(path: &Path) {
    if is_initialized() {
        return;
    }
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).write(true).truncate(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("[logger] cannot open {}: {}", path.display(), e);
            return;
        }
    };
    if SINK.set(Sink { path: path.to_path_buf(), file: Mutex::new(file) }).is_err() {
        return;
    }

    append(&format!("=== tilepaint log opened at unix {} ===", unix_seconds()));

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write(Level::Panic, &info.to_string());
        prev(info);
    }));
}

fn default_log_path() -> PathBuf {
    data_dir().join("tilepaint").join("tilepaint.log")
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library").join("Application Support");
        }
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local").join("share"),
        Err(_) => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_are_silent_without_init() {
        if !is_initialized() {
            crate::log_warn!("ignored {}", 1);
            assert!(log_path().is_none());
        }
    }

    #[test]
    fn lines_carry_utc_clock_and_level() {
        // 1970-01-02 01:02:03
        let secs = 86_400 + 3600 + 2 * 60 + 3;
        assert_eq!(format_line(Level::Warn, "tile 1|0 hidden", secs), "[01:02:03] [WARN] tile 1|0 hidden");
        assert_eq!(format_line(Level::Error, "x", 0), "[00:00:00] [ERROR] x");
    }
}
