//! `list`: the case catalog.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use console::style;
use crossbench_common::{CASES, Case};

use crate::exit::EXIT_SUCCESS;
use crate::output::{OutputConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn execute(&self) -> Result<i32> {
        let output = OutputConfig::new(self.format, false);
        let mut stdout = std::io::stdout().lock();
        output.emit_result(&CASES, &mut stdout, |cases, out| write_cases(cases, out))?;
        Ok(EXIT_SUCCESS)
    }
}

pub fn write_cases(cases: &[Case], out: &mut dyn Write) -> std::io::Result<()> {
    for case in cases {
        writeln!(out, "{}  {}", style(case.id).bold(), case.label)?;
        writeln!(
            out,
            "    {} default {}, range {}{}",
            case.param_label,
            case.default_param,
            case.bounds_summary(),
            case.step.map(|s| format!(", step {s}")).unwrap_or_default()
        )?;
        writeln!(out, "    {}", case.description)?;
    }
    Ok(())
}
