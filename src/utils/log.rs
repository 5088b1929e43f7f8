//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `log_ok!` for stage completion lines carrying a success indicator
//! - `log_err!` for failures, written to stderr without truncation
//!
//! # Example
//!
//! ```ignore
//! log!("assets"; "found {} pages", count);
//! log_ok!("bundle"; "worker built");
//! log_err!("build"; "failed: {:#}", err);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stderr, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

// ============================================================================
// Layout Constants
// ============================================================================
//
// Line format: "[module] ✔ message"
//               ^------^ ^ ^-----^
//               prefix   mark

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;
/// Indicator plus its trailing space: "✔ "
const MARK_LEN: usize = 2;

const SUCCESS_MARK: &str = "✔";
const FAILURE_MARK: &str = "✘";

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for "[", "]", and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Log a completed stage with a green success mark.
#[macro_export]
macro_rules! log_ok {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::success($module, &format!($($arg)*))
    }};
}

/// Log a failure with a red mark to stderr.
#[macro_export]
macro_rules! log_err {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::failure($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Automatically truncates long messages to fit terminal width.
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let max_msg_len = available_width(calc_prefix_len(module.len()));
    let message = truncate_str(message, max_msg_len);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Log a message prefixed with the success mark.
pub fn success(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let max_msg_len = available_width(calc_prefix_len(module.len()) + MARK_LEN);
    let message = truncate_str(message, max_msg_len);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {} {message}", SUCCESS_MARK.green()).ok();
    stdout.flush().ok();
}

/// Log a message prefixed with the failure mark.
///
/// Error chains can span several lines, so nothing is truncated here.
pub fn failure(module: &str, message: &str) {
    let prefix = colorize_prefix(module, "error");

    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {} {message}", FAILURE_MARK.red()).ok();
    stderr.flush().ok();
}

fn available_width(used: usize) -> usize {
    (get_terminal_width() as usize).saturating_sub(used)
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "package" => prefix.bright_green().bold(),
        "bundle" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes.
///
/// Ensures truncation happens at a valid UTF-8 character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len() {
        // "bundle" -> "[bundle] " = 6 + 2 + 1 = 9
        assert_eq!(calc_prefix_len(6), 9);
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_fits() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_cuts() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "✔" is 3 bytes; cutting inside it backs off to the previous boundary
        assert_eq!(truncate_str("a✔b", 3), "a");
        assert_eq!(truncate_str("a✔b", 4), "a✔");
    }

    #[test]
    fn test_colorize_prefix_contains_module() {
        colored::control::set_override(false);
        assert_eq!(colorize_prefix("bundle", "bundle").to_string(), "[bundle]");
        assert_eq!(colorize_prefix("Error", "error").to_string(), "[Error]");
    }
}
