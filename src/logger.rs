//! Structured logging with box-drawing output.
//!
//! The calendar engine reports progress through these macros rather than printing
//! directly. Output goes to stdout, or to a file when [`Log::start_file_logging`]
//! has been called. Debug-level messages are suppressed unless debug output was
//! switched on with [`Log::set_debug`], which keeps per-day tracing of a full year
//! out of normal runs.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Channel for routing output to file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Logging facade.
///
/// ## Conventions
///
/// - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
///   Follow it with `log_decorated!` or `log_indented!` for related lines.
/// - **`log_decorated!`** prints `┣ message` inside the current block.
/// - **`log_indented!`** prints `┃   message` for nested details such as the
///   months of a generated year.
/// - **`log_pipe!`** inserts a bare `┃` before a standalone `log_warning!`,
///   `log_error!`, `log_info!` or `log_debug!` line.
/// - **`log_version!`** / **`log_end!`** open and close a run.
/// - **`log_debug!`** only prints when debug output is enabled.
pub struct Log;

impl Log {
    /// Enable or disable all logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if debug output is currently enabled.
    pub fn is_debug_enabled() -> bool {
        Self::is_enabled() && DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Route all further output to `file_path` until the returned guard drops.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }
}

/// Guard for file logging that flushes and joins the writer thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Remove ANSI color sequences (`ESC [ ... m`) so log files stay plain text.
pub(crate) fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

/// Shared expansion for every single-line macro below.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($template:literal, $fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!($template, message));
        }
    }};
    ($template:literal, $expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!($template, expr));
        }
    }};
}

/// Log a decorated message as part of the current block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => { $crate::__log_line!("┣ {}\n", $($arg)+) };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => { $crate::__log_line!("┃   {}\n", $($arg)+) };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => { $crate::__log_line!("┃\n┣ {}\n", $($arg)+) };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] {}\n", $($arg)+) };
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+) };
}

/// Log an error that terminates the run, closing the pipe with a corner.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => { $crate::__log_line!("┃\n┗[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+) };
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] {}\n", $($arg)+) };
}

/// Log a debug message; silent unless [`Log::set_debug`] enabled it.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug_enabled() {
            $crate::__log_line!("┣[\x1b[36mDEBUG\x1b[0m] {}\n", $($arg)+)
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::write_output("┃\n");
        }
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        if $crate::logger::Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::logger::write_output(&format!("┏ orbitcal v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::write_output("╹\n");
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(
            strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] careful"),
            "┣[WARNING] careful"
        );
        assert_eq!(strip_ansi_codes("plain"), "plain");
        assert_eq!(strip_ansi_codes("lone \x1b escape"), "lone \x1b escape");
    }

    #[test]
    #[serial]
    fn test_debug_requires_logging_enabled() {
        Log::set_enabled(true);
        Log::set_debug(true);
        assert!(Log::is_debug_enabled());

        Log::set_enabled(false);
        assert!(!Log::is_debug_enabled());

        Log::set_enabled(true);
        Log::set_debug(false);
        assert!(!Log::is_debug_enabled());
    }

    #[test]
    #[serial]
    fn test_macros_accept_literals_and_expressions() {
        Log::set_enabled(false);
        let year = 2025;
        log_block_start!("Generating orbital year {}", year);
        log_decorated!("plain literal");
        log_indented!(format!("{year} expression"));
        log_warning!("warning {year}");
        log_debug!("debug {}", year);
        log_pipe!();
        log_end!();
        Log::set_enabled(true);
    }
}
