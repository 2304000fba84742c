//! Output printer with format awareness.

use std::fmt::Display;
use std::io;

use clap::ColorChoice;
use is_terminal::IsTerminal;
use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};

/// Output configuration
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl OutputConfig {
    pub fn from_context(ctx: &CommandContext) -> Self {
        Self {
            format: ctx.format,
            color: use_color(ctx.color, io::stdout().is_terminal()),
            quiet: ctx.quiet,
        }
    }
}

/// Resolve a color choice; `NO_COLOR` disables `auto`.
pub fn use_color(choice: ColorChoice, is_tty: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_tty && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Main output handler
pub struct Output {
    config: OutputConfig,
}

impl Output {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            config: OutputConfig::from_context(ctx),
        }
    }

    pub fn is_json(&self) -> bool {
        self.config.format == OutputFormat::Json
    }

    /// Print a value with appropriate formatting
    pub fn print<T>(&self, value: &T) -> Result<(), serde_json::Error>
    where
        T: Serialize + Display,
    {
        match self.config.format {
            OutputFormat::Json => self.print_json(value),
            OutputFormat::Text => {
                println!("{value}");
                Ok(())
            }
        }
    }

    /// Print as JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string_pretty(value)?;
        println!("{json}");
        Ok(())
    }

    /// Print a success message (text mode only, respects quiet mode)
    pub fn success(&self, msg: &str) {
        if self.config.quiet || self.is_json() {
            return;
        }
        if self.config.color {
            println!("\x1b[32m{msg}\x1b[0m");
        } else {
            println!("{msg}");
        }
    }

    /// Print a warning
    pub fn warning(&self, msg: &str) {
        if self.config.color {
            eprintln!("\x1b[33mWarning: {msg}\x1b[0m");
        } else {
            eprintln!("Warning: {msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_choice() {
        assert!(use_color(ColorChoice::Always, false));
        assert!(!use_color(ColorChoice::Never, true));
        assert!(!use_color(ColorChoice::Auto, false));
    }
}
