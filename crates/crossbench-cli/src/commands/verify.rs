//! `verify`: checksum parity of every engine against the reference kernels.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use crossbench_common::lookup;
use crossbench_kernels::{LoaderOptions, resolve};
use crossbench_runner::{ParityReport, ParityStatus, verify};

use crate::config::CliConfig;
use crate::exit::{EXIT_PARITY_FAIL, EXIT_SUCCESS};
use crate::output::{OutputConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Benchmark case (fib, prime_sieve, arith_loop, matmul)
    #[arg(long, value_name = "CASE")]
    pub case: String,

    /// Kernel parameter (defaults to the case's default)
    #[arg(short, long, value_name = "N")]
    pub param: Option<u32>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

impl VerifyCommand {
    pub async fn execute(&self, config: &CliConfig) -> Result<i32> {
        let case = lookup(&self.case)?;
        let param = self.param.unwrap_or(case.default_param);
        let registry = resolve(&LoaderOptions::from(&config.harness)).await;
        let report = verify(&registry, case.id.as_str(), param).context("Parity check failed to start")?;

        let output = OutputConfig::new(self.format, false);
        let mut stdout = std::io::stdout().lock();
        output.emit_result(&report, &mut stdout, |report, out| write_parity(report, out))?;

        Ok(if report.all_match() { EXIT_SUCCESS } else { EXIT_PARITY_FAIL })
    }
}

pub fn write_parity(report: &ParityReport, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}({}) expected checksum {}", report.case_id, report.param, report.expected)?;
    for entry in &report.entries {
        let marker = match entry.status {
            ParityStatus::Match => style("✓").green(),
            ParityStatus::Skipped { .. } => style("-").dim(),
            ParityStatus::Mismatch { .. } | ParityStatus::Failed { .. } => style("✗").red(),
        };
        writeln!(out, "{marker} {:<10} {}", entry.engine.as_str(), entry.status)?;
    }
    Ok(())
}
