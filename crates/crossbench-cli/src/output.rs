//! Output configuration for CLI commands.
//!
//! `--format json` emits machine-readable JSON; `--quiet` suppresses the
//! progress bar and status lines. Status output always goes to stderr so
//! stdout stays parseable.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'. Expected one of: text, json")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    fn interactive(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    /// Print a status message (suppressed in quiet mode and JSON mode).
    pub fn status(&self, msg: &str) {
        if self.interactive() {
            eprintln!("{msg}");
        }
    }

    /// Progress bar over `steps` events, hidden unless output is interactive.
    pub fn progress_bar(&self, steps: usize) -> ProgressBar {
        if !self.interactive() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(steps as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    /// Emit a final result value to `sink`. In JSON mode it is serialized;
    /// in text mode `text_fn` renders it.
    pub fn emit_result<T: Serialize>(
        &self,
        value: &T,
        sink: &mut dyn Write,
        text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *sink, value)?;
                writeln!(sink)?;
            }
            OutputFormat::Text => text_fn(value, sink)?,
        }
        sink.flush()?;
        Ok(())
    }
}

/// Stdout, or a freshly created file.
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().unwrap_err().contains("csv"));
    }

    #[test]
    fn json_mode_serializes() {
        let output = OutputConfig::new(OutputFormat::Json, false);
        let mut buf = Vec::new();
        output.emit_result(&vec![1, 2], &mut buf, |_, _| unreachable!()).unwrap();
        let parsed: Vec<i32> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![1, 2]);
    }

    #[test]
    fn text_mode_uses_renderer() {
        let output = OutputConfig::default();
        let mut buf = Vec::new();
        output.emit_result(&"x", &mut buf, |v, w| writeln!(w, "value={v}")).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "value=x\n");
    }

    #[test]
    fn quiet_hides_progress() {
        assert!(OutputConfig::new(OutputFormat::Text, true).progress_bar(10).is_hidden());
        assert!(OutputConfig::new(OutputFormat::Json, false).progress_bar(10).is_hidden());
    }
}
