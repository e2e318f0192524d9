use owbench_core::{AggregateStats, BenchConfig, ProgressFn};

use crate::cli::OutputFormat;

pub(crate) mod csv;
mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, cfg: &BenchConfig, apihost: &str);
    fn progress(&self, cfg: &BenchConfig) -> Option<ProgressFn>;
    fn print_summary(&self, stats: &AggregateStats, cfg: &BenchConfig) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat, verbose: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new(verbose)),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
