//! External command execution utilities.
//!
//! Runs a command to completion, captures its output and turns a non-zero
//! exit into an error carrying the filtered diagnostics.

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
    sync::OnceLock,
};

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// `cmd` holds the program followed by any fixed leading arguments (as
/// configured, e.g. `["npx", "esbuild"]`), `args` the per-invocation ones.
/// Empty arguments are dropped.
///
/// # Errors
/// Returns error if command fails to execute or returns non-zero exit code.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output> {
    let args = filter_args(args);
    let (name, mut command) = prepare(root, cmd, &args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output, filter)?;
    Ok(output)
}

/// Filter out empty args.
#[inline]
fn filter_args(args: &[OsString]) -> Vec<OsString> {
    args.iter().filter(|a| !a.is_empty()).cloned().collect()
}

/// Prepare a Command from components.
fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let name = cmd
        .first()
        .and_then(|s| s.to_str())
        .context("Empty command")?
        .to_owned();

    let mut command = Command::new(&cmd[0]);
    command.args(&cmd[1..]).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Filter rule for skipping entire output blocks or specific prefixes.
///
/// Used to reduce noise in command output logging by ignoring known
/// messages.
pub struct FilterRule {
    /// Prefixes to match at the start of output lines.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    /// Create a new filter rule with the given prefixes.
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Check if output should be skipped entirely.
    ///
    /// Returns true if output is empty or starts with any of the skip prefixes.
    fn should_skip(&self, output: &str) -> bool {
        output.is_empty() || self.skip_prefixes.iter().any(|p| output.starts_with(p))
    }

    /// Log output lines if not skipped.
    fn log(&self, name: &str, output: &str) {
        let mut valid_lines = Vec::new();
        for line in output.lines() {
            let plain = strip_ansi(line);
            let trimmed = plain.trim();
            if !trimmed.is_empty() && !self.should_skip(trimmed) {
                valid_lines.push(plain.into_owned());
            }
        }

        for line in valid_lines {
            log!(name; "{}", line);
        }
    }
}

/// Stdout filter: skip bundled module text echoed back on failure.
const STDOUT_FILTER: FilterRule = FilterRule::new(&["//", "var ", "import "]);

/// Log command output, filtering known noise.
fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        anyhow::bail!(format_error(name, output, filter));
    }

    // On success, only log stderr (warnings); stdout is the payload
    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());

    Ok(())
}

/// Format command error message with filtering.
fn format_error(name: &str, output: &Output, filter: &'static FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let stderr = strip_ansi(stderr.trim()).into_owned();
    let error_msg = filter
        .skip_prefixes
        .iter()
        .fold(stderr.as_str(), |s, p| s.trim_start_matches(p).trim_start());

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    if !error_msg.is_empty() {
        msg.push_str(error_msg);
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() && !STDOUT_FILTER.should_skip(stdout_trimmed) {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
