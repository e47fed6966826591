//! `run`: measure one case on every engine.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use crossbench_common::{Engine, lookup};
use crossbench_kernels::{LoaderOptions, resolve};
use crossbench_runner::{
    BenchmarkResult, BenchmarkRunner, ParityReport, ParityStatus, ProgressEvent, RunnerConfig,
    expected_progress_steps, format_time_ms, verify,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::exit::{EXIT_ENGINE_FAIL, EXIT_PARITY_FAIL, EXIT_SUCCESS};
use crate::output::{OutputConfig, OutputFormat, open_sink};

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Benchmark case (fib, prime_sieve, arith_loop, matmul)
    #[arg(long, value_name = "CASE")]
    pub case: String,

    /// Kernel parameter (defaults to the case's default)
    #[arg(short, long, value_name = "N")]
    pub param: Option<u32>,

    /// Warmup calls per engine (overrides the configuration)
    #[arg(long, value_name = "N")]
    pub warmup: Option<usize>,

    /// Measured rounds per engine (overrides the configuration)
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Skip the checksum parity check before timing
    #[arg(long)]
    pub no_verify: bool,

    /// Exit non-zero if an available engine fails
    #[arg(long)]
    pub strict: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file for results
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Everything a `run` reports.
#[derive(Debug, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub result: BenchmarkResult,
    pub warmup: usize,
    pub rounds: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parity: Option<ParityReport>,
}

impl RunReport {
    fn parity_failed(&self) -> bool {
        self.parity.as_ref().is_some_and(|p| !p.all_match())
    }

    /// Available engines that did not produce a time.
    fn engine_failures(&self) -> usize {
        self.result.failures().filter(|entry| !entry.is_unavailable()).count()
    }
}

impl RunCommand {
    pub async fn execute(&self, config: &CliConfig) -> Result<i32> {
        let case = lookup(&self.case)?;
        let param = self.param.unwrap_or(case.default_param);
        let warmup = self.warmup.unwrap_or(config.harness.warmup);
        let rounds = self.rounds.unwrap_or(config.harness.rounds);
        if rounds == 0 {
            bail!("--rounds must be at least 1");
        }
        if !case.in_bounds(param) {
            warn!(
                case = %case.id,
                param,
                range = %case.bounds_summary(),
                "parameter outside the suggested range; running anyway"
            );
        }

        let output = OutputConfig::new(self.format, self.quiet);
        let registry = resolve(&LoaderOptions::from(&config.harness)).await;

        let parity = if self.no_verify {
            None
        } else {
            output.status("Verifying checksums...");
            Some(verify(&registry, case.id.as_str(), param).context("Parity check failed to start")?)
        };

        let steps = expected_progress_steps(&registry, case.id, warmup, rounds);
        let pb = output.progress_bar(steps);
        let mut on_progress = |event: ProgressEvent| {
            pb.set_message(event.to_string());
            pb.inc(1);
        };

        info!(case = %case.id, param, warmup, rounds, steps, "running benchmark");
        let result = BenchmarkRunner::new(&registry)
            .with_config(RunnerConfig::from(&config.harness))
            .run(case.id.as_str(), param, warmup, rounds, Some(&mut on_progress))
            .await
            .context("Benchmark run failed")?;
        pb.finish_and_clear();

        let report = RunReport { result, warmup, rounds, parity };
        let mut sink = open_sink(self.output.as_deref())?;
        output.emit_result(&report, &mut sink, |report, out| write_report(report, out))?;
        if let Some(path) = &self.output {
            output.status(&format!("{} Results written to {}", style("✓").green(), path.display()));
        }

        if report.parity_failed() {
            warn!("at least one engine returned a wrong checksum");
            return Ok(EXIT_PARITY_FAIL);
        }
        if self.strict && report.engine_failures() > 0 {
            return Ok(EXIT_ENGINE_FAIL);
        }
        Ok(EXIT_SUCCESS)
    }
}

/// Note column for one engine: the failure reason, a parity problem, or
/// a marker for the fastest engine.
fn note(report: &RunReport, engine: Engine) -> String {
    let entry = report.result.entry(engine);
    if let Some(error) = entry.and_then(|e| e.error.as_deref()) {
        return error.to_string();
    }
    match report.parity.as_ref().and_then(|p| p.status(engine)) {
        Some(status @ (ParityStatus::Mismatch { .. } | ParityStatus::Failed { .. })) => {
            return format!("checksum {status}");
        }
        _ => {}
    }
    match report.result.fastest() {
        Some(fastest) if fastest.engine == engine => "fastest".to_string(),
        _ => String::new(),
    }
}

pub fn write_report(report: &RunReport, out: &mut dyn Write) -> std::io::Result<()> {
    let result = &report.result;
    let case = result.case_id.case();

    writeln!(out, "\n{}", style(case.label).bold().cyan())?;
    writeln!(
        out,
        "{} = {}, warmup {}, rounds {}",
        case.param_label, result.param, report.warmup, report.rounds
    )?;
    writeln!(out)?;
    writeln!(out, "{:<10} {:>12} {:>10} {:>12}  {}", "engine", "best time", "x faster", "vs baseline", "note")?;

    for entry in &result.results {
        let relative =
            result.relative_speed(entry).map(|r| format!("{r:.2}x")).unwrap_or_else(|| "-".to_string());
        let vs_baseline =
            result.speedup_vs_baseline(entry).map(|r| format!("{r:.2}x")).unwrap_or_else(|| "-".to_string());
        let note = note(report, entry.engine);
        let note = if entry.error.is_some() {
            style(note).red().to_string()
        } else if note == "fastest" {
            style(note).green().to_string()
        } else {
            style(note).yellow().to_string()
        };
        writeln!(
            out,
            "{:<10} {:>12} {:>10} {:>12}  {}",
            entry.engine.as_str(),
            format_time_ms(entry.time_ms),
            relative,
            vs_baseline,
            note
        )?;
    }

    if let Some(checksum) = result.baseline().and_then(|b| b.checksum) {
        writeln!(out, "\nchecksum: {checksum}")?;
    }
    Ok(())
}
