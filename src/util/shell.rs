//! Centralized console output.
//!
//! All user-facing status lines go through [`Shell`]. Every write holds the
//! shell's console lock, so lines from concurrent workers never interleave.
//!
//! Format: `{status:>12} {message}` on stderr, optionally colored.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: also reports abandoned spans
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Generated,
    Formatted,
    Finished,
    Removed,
    Published,

    // In-progress statuses (cyan)
    Building,
    Running,
    Formatting,
    Capturing,
    Installing,

    Info,

    // Warning statuses (yellow)
    Warning,

    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Generated => "Generated",
            Status::Formatted => "Formatted",
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Published => "Published",
            Status::Building => "Building",
            Status::Running => "Running",
            Status::Formatting => "Formatting",
            Status::Capturing => "Capturing",
            Status::Installing => "Installing",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created
            | Status::Generated
            | Status::Formatted
            | Status::Finished
            | Status::Removed
            | Status::Published => "\x1b[1;32m",
            Status::Building
            | Status::Running
            | Status::Formatting
            | Status::Capturing
            | Status::Installing => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }

    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    console: Mutex<()>,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            console: Mutex::new(()),
        }
    }

    /// Create a shell from CLI flags; quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message. In quiet mode only errors are printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }

        let line = format!("{} {}", self.format_status(status), msg);
        self.write_line(&mut io::stderr(), &line);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    /// Print a raw line to stdout under the console lock.
    pub fn println(&self, msg: impl Display) {
        self.write_line(&mut io::stdout(), &msg.to_string());
    }

    /// Print a raw line to stderr under the console lock, even when quiet.
    pub fn println_err(&self, msg: impl Display) {
        self.write_line(&mut io::stderr(), &msg.to_string());
    }

    fn write_line(&self, out: &mut dyn Write, line: &str) {
        let _guard = self.console.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Start a timed span; the finish line reports the elapsed time.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        Span::new(Arc::clone(self), status, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// A scoped timing span.
///
/// The start line prints immediately; the end line with the duration
/// prints on `finish*`. A span dropped unfinished only reports in verbose
/// mode.
pub struct Span {
    shell: Arc<Shell>,
    message: String,
    start: Instant,
    finished: bool,
}

impl Span {
    fn new(shell: Arc<Shell>, status: Status, message: String) -> Self {
        shell.status(status, &message);

        Span {
            shell,
            message,
            start: Instant::now(),
            finished: false,
        }
    }

    /// Finish with a custom message.
    pub fn finish_with_message(mut self, msg: impl Display) {
        self.finished = true;
        let msg = format!("{} in {}", msg, format_duration(self.start.elapsed()));
        self.shell.status(Status::Finished, msg);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if self.finished || !self.shell.is_verbose() {
            return;
        }
        self.shell.status(
            Status::Info,
            format!("{} stopped after {}", self.message, format_duration(self.start.elapsed())),
        );
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
