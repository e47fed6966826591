//! `engines`: which engines resolved and what they can run.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use console::style;
use crossbench_common::{CaseId, Engine};
use crossbench_kernels::{KernelRegistry, LoaderOptions, resolve};
use serde::Serialize;

use crate::config::CliConfig;
use crate::exit::EXIT_SUCCESS;
use crate::output::{OutputConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct EnginesCommand {
    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub engine: Engine,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub cases: Vec<CaseId>,
}

pub fn engine_statuses(registry: &KernelRegistry) -> Vec<EngineStatus> {
    registry
        .iter()
        .map(|(engine, slot)| EngineStatus {
            engine,
            available: slot.is_available(),
            provider: slot.provider().map(|p| p.name()),
            reason: slot.reason().map(str::to_string),
            cases: slot
                .provider()
                .map(|p| CaseId::ALL.into_iter().filter(|&case| p.supports(case)).collect())
                .unwrap_or_default(),
        })
        .collect()
}

impl EnginesCommand {
    pub async fn execute(&self, config: &CliConfig) -> Result<i32> {
        let registry = resolve(&LoaderOptions::from(&config.harness)).await;
        let statuses = engine_statuses(&registry);
        let output = OutputConfig::new(self.format, false);
        let mut stdout = std::io::stdout().lock();
        output.emit_result(&statuses, &mut stdout, |statuses, out| write_statuses(statuses, out))?;
        Ok(EXIT_SUCCESS)
    }
}

fn write_statuses(statuses: &[EngineStatus], out: &mut dyn Write) -> std::io::Result<()> {
    for status in statuses {
        if status.available {
            let cases: Vec<&str> = status.cases.iter().map(|c| c.as_str()).collect();
            writeln!(
                out,
                "{} {:<10} {}",
                style("✓").green(),
                status.engine.as_str(),
                cases.join(", ")
            )?;
        } else {
            writeln!(
                out,
                "{} {:<10} {}",
                style("✗").red(),
                status.engine.as_str(),
                style(status.reason.as_deref().unwrap_or("not available")).dim()
            )?;
        }
    }
    Ok(())
}
