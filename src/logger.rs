//! Per-session log file.
//!
//! [`init`] creates (or truncates) `RasterPaint/rasterpaint.log` under the OS
//! data directory, so the file only ever holds the latest session:
//!   Windows:  `%APPDATA%\RasterPaint\rasterpaint.log`
//!   Linux:    `$XDG_DATA_HOME` or `~/.local/share`, then `RasterPaint/rasterpaint.log`
//!   macOS:    `~/Library/Application Support/RasterPaint/rasterpaint.log`
//!
//! Log through `log_info!` / `log_warn!` / `log_err!`. Before [`init`] (unit
//! tests, `--no-log`) every line is dropped.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        })
    }
}

struct Session {
    path: PathBuf,
    file: Mutex<File>,
}

static SESSION: OnceLock<Session> = OnceLock::new();

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

/// True once [`init`] has opened the log file.
pub fn is_enabled() -> bool {
    SESSION.get().is_some()
}

/// Path of the open log file, if any.
pub fn log_path() -> Option<&'static Path> {
    SESSION.get().map(|s| s.path.as_path())
}

/// Append one `[HH:MM:SS] [LEVEL] message` line. I/O errors are ignored.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    let Some(session) = SESSION.get() else {
        return;
    };
    let line = format_line(&clock(), level, args);
    if let Ok(mut file) = session.file.lock() {
        let _ = writeln!(file, "{}", line);
    }
}

fn write_raw(line: &str) {
    if let Some(session) = SESSION.get()
        && let Ok(mut file) = session.file.lock()
    {
        let _ = writeln!(file, "{}", line);
    }
}

fn format_line(clock: &str, level: Level, args: fmt::Arguments<'_>) -> String {
    format!("[{}] [{}] {}", clock, level, args)
}

/// Open the session log and install a panic hook that records panics before
/// the default handler runs. Returns the log path, or `None` if the file
/// could not be opened (the session then runs unlogged).
pub fn init() -> Option<PathBuf> {
    if let Some(path) = log_path() {
        return Some(path.to_path_buf());
    }

    let path = data_dir().join("RasterPaint").join("rasterpaint.log");
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("[logger] cannot open {}: {}", path.display(), e);
            return None;
        }
    };
    let _ = SESSION.set(Session {
        path: path.clone(),
        file: Mutex::new(file),
    });

    write_raw(&format!("=== RasterPaint session (unix {}) ===", unix_secs()));
    write_raw(&format!("Log file: {}", path.display()));
    write_raw("");

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write(Level::Panic, format_args!("{}", info));
        default_hook(info);
    }));

    Some(path)
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata);
    }
    #[cfg(target_os = "macos")]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join("Library").join("Application Support");
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// UTC wall clock as HH:MM:SS.
fn clock() -> String {
    let secs = unix_secs();
    format!(
        "{:02}:{:02}:{:02}",
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format() {
        let line = format_line("01:02:03", Level::Warn, format_args!("{} px", 42));
        assert_eq!(line, "[01:02:03] [WARN] 42 px");
    }

    #[test]
    fn writes_before_init_are_dropped() {
        // Unit tests never call init.
        assert!(!is_enabled());
        assert!(log_path().is_none());
        crate::log_info!("dropped {}", 1);
        crate::log_err!("dropped");
    }

    #[test]
    fn clock_shape() {
        let c = clock();
        assert_eq!(c.len(), 8);
        assert_eq!(c.as_bytes()[2], b':');
    }
}
