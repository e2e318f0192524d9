use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context as _;
use owbench_core::{AggregateStats, MetricStats};

/// CSV rendering of the aggregate, one row per metric. The success-rate row
/// carries the percentage in the Average column and leaves the rest empty.
pub(crate) fn render(stats: &AggregateStats) -> String {
    let mut out = String::from("Metric,Average,Min,Max,Std\n");

    metric_row(&mut out, "InitTime", &stats.init_time);
    metric_row(&mut out, "WaitTime", &stats.wait_time);
    metric_row(&mut out, "Duration", &stats.duration);
    metric_row(&mut out, "Client Elapsed Time", &stats.client_elapsed);
    writeln!(&mut out, "Success Rate,{:.2}%,,,", stats.success_rate).ok();

    out
}

pub(crate) fn write(path: &Path, stats: &AggregateStats) -> anyhow::Result<()> {
    std::fs::write(path, render(stats))
        .with_context(|| format!("failed to write results csv: {}", path.display()))
}

fn metric_row(out: &mut String, name: &str, m: &MetricStats) {
    writeln!(
        out,
        "{name},{:.4},{:.4},{:.4},{:.4}",
        m.avg, m.min, m.max, m.stdev
    )
    .ok();
}
