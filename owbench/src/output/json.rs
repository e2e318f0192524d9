use serde::Serialize;
use std::io::Write as _;

use owbench_core::{AggregateStats, BenchConfig, MetricStats, ProgressFn};
use std::sync::Arc;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _cfg: &BenchConfig, _apihost: &str) {}

    fn progress(&self, _cfg: &BenchConfig) -> Option<ProgressFn> {
        Some(Arc::new(move |u| {
            let line = JsonProgressLine {
                kind: "progress",
                phase: u.phase.to_string(),
                run: u.run,
                runs: u.runs,
                invocation: u.invocation,
                invocations: u.invocations,
                success: u.record.success,
                error: u.error,
            };
            emit_json_line(&line);
        }))
    }

    fn print_summary(&self, stats: &AggregateStats, cfg: &BenchConfig) -> anyhow::Result<()> {
        let line = build_summary_line(stats, cfg);
        emit_json_line(&line);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct JsonProgressLine {
    kind: &'static str,
    phase: String,
    run: u32,
    runs: u32,
    invocation: u32,
    invocations: u32,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub function: String,
    pub mode: String,
    pub warmup_invocations: u32,
    pub num_runs: u32,
    pub num_invocations: u32,
    pub samples: u64,
    pub success_rate: f64,
    pub init_time: MetricStats,
    pub wait_time: MetricStats,
    pub duration: MetricStats,
    pub client_elapsed: MetricStats,
}

fn build_summary_line(stats: &AggregateStats, cfg: &BenchConfig) -> JsonSummaryLine {
    JsonSummaryLine {
        kind: "summary",
        function: cfg.function.clone(),
        mode: cfg.mode.to_string(),
        warmup_invocations: cfg.warmup_invocations,
        num_runs: cfg.num_runs,
        num_invocations: cfg.num_invocations,
        samples: stats.samples,
        success_rate: stats.success_rate,
        init_time: stats.init_time,
        wait_time: stats.wait_time,
        duration: stats.duration,
        client_elapsed: stats.client_elapsed,
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn summary_line_carries_kind_and_metrics() {
        let m = MetricStats {
            avg: 2.0,
            min: 1.0,
            max: 3.0,
            stdev: 1.0,
        };
        let stats = AggregateStats {
            init_time: m,
            wait_time: m,
            duration: m,
            client_elapsed: m,
            success_rate: 50.0,
            samples: 4,
        };
        let cfg = BenchConfig::default();

        let line = build_summary_line(&stats, &cfg);
        let v: Value = match serde_json::to_value(&line) {
            Ok(v) => v,
            Err(err) => panic!("to_value failed: {err}"),
        };

        assert_eq!(v.get("kind").and_then(Value::as_str), Some("summary"));
        assert_eq!(v.get("mode").and_then(Value::as_str), Some("polling"));
        assert_eq!(v.get("samples").and_then(Value::as_u64), Some(4));
        assert_eq!(
            v.pointer("/duration/avg").and_then(Value::as_f64),
            Some(2.0)
        );
        assert_eq!(
            v.get("success_rate").and_then(Value::as_f64),
            Some(50.0)
        );
    }
}
