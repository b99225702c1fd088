//! Colored terminal output.

use crate::report::Reporter;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colored, quiet/verbose-aware console output.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn stdout() -> StandardStream {
        StandardStream::stdout(choice(io::stdout().is_terminal()))
    }

    fn stderr() -> StandardStream {
        StandardStream::stderr(choice(io::stderr().is_terminal()))
    }

    fn tagged(
        stream: &mut StandardStream,
        color: Color,
        tag: &str,
        message: &str,
    ) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{tag}")?;
        stream.reset()?;
        writeln!(stream, " {message}")
    }

    /// Neutral information.
    pub fn info(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::tagged(&mut Self::stdout(), Color::Blue, "[i]", message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::tagged(&mut Self::stdout(), Color::Green, "[ok]", message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::tagged(&mut Self::stderr(), Color::Yellow, "[!]", message)
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        Self::tagged(&mut Self::stderr(), Color::Red, "[x]", message)
    }

    /// Only shown with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "    {message}")?;
        out.reset()
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::tagged(&mut Self::stdout(), Color::Cyan, "==>", message)
    }

    /// Section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = Self::stdout();
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_bold(true).set_underline(true))?;
        write!(out, "{title}")?;
        out.reset()?;
        writeln!(out)
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(Self::stdout(), "    {message}")
    }

    /// Plain line, printed even in quiet mode (generated paths, run commands).
    pub fn println(&self, message: &str) -> io::Result<()> {
        writeln!(Self::stdout(), "{message}")
    }
}

fn choice(is_terminal: bool) -> ColorChoice {
    if is_terminal && std::env::var_os("NO_COLOR").is_none() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

impl Reporter for OutputManager {
    fn info(&self, message: &str) {
        let _ = OutputManager::info(self, message);
    }

    fn success(&self, message: &str) {
        let _ = OutputManager::success(self, message);
    }

    fn warn(&self, message: &str) {
        let _ = OutputManager::warn(self, message);
    }

    fn error(&self, message: &str) {
        let _ = OutputManager::error(self, message);
    }
}
