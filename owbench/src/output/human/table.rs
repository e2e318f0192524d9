use std::fmt::Write as _;

use owbench_core::{AggregateStats, BenchConfig, MetricStats};

const METRIC_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 14;

pub(crate) fn render(stats: &AggregateStats, cfg: &BenchConfig) -> String {
    let mut out = String::new();

    out.push_str("benchmark results\n");
    writeln!(&mut out, "  warm-up invocations: {}", cfg.warmup_invocations).ok();
    writeln!(&mut out, "  runs: {}", cfg.num_runs).ok();
    writeln!(&mut out, "  invocations per run: {}", cfg.num_invocations).ok();
    writeln!(&mut out, "  samples: {}", stats.samples).ok();
    out.push('\n');

    writeln!(
        &mut out,
        "{:<METRIC_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$}",
        "Metric", "Average", "Minimum", "Maximum", "Std Dev"
    )
    .ok();

    metric_row(&mut out, "InitTime", &stats.init_time);
    metric_row(&mut out, "WaitTime", &stats.wait_time);
    metric_row(&mut out, "Duration", &stats.duration);
    metric_row(&mut out, "Client Elapsed Time", &stats.client_elapsed);

    // Success rate has no min/max/stdev notion.
    writeln!(
        &mut out,
        "{:<METRIC_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$}",
        "Success Rate",
        format!("{:.2}%", stats.success_rate),
        "-",
        "-",
        "-"
    )
    .ok();

    out
}

fn metric_row(out: &mut String, name: &str, m: &MetricStats) {
    writeln!(
        out,
        "{:<METRIC_WIDTH$} {:>VALUE_WIDTH$.4} {:>VALUE_WIDTH$.4} {:>VALUE_WIDTH$.4} {:>VALUE_WIDTH$.4}",
        name, m.avg, m.min, m.max, m.stdev
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> AggregateStats {
        let m = MetricStats {
            avg: 12.5,
            min: 0.0,
            max: 25.0,
            stdev: 17.6777,
        };
        AggregateStats {
            init_time: m,
            wait_time: m,
            duration: m,
            client_elapsed: m,
            success_rate: 100.0 * 5.0 / 6.0,
            samples: 6,
        }
    }

    #[test]
    fn render_includes_all_metric_rows_and_counts() {
        let cfg = BenchConfig {
            num_runs: 2,
            num_invocations: 3,
            warmup_invocations: 1,
            ..BenchConfig::default()
        };
        let text = render(&stats(), &cfg);

        assert!(text.contains("warm-up invocations: 1"));
        assert!(text.contains("runs: 2"));
        assert!(text.contains("invocations per run: 3"));
        assert!(text.contains("samples: 6"));
        assert!(text.contains("InitTime"));
        assert!(text.contains("WaitTime"));
        assert!(text.contains("Duration"));
        assert!(text.contains("Client Elapsed Time"));
        assert!(text.contains("12.5000"));
    }

    #[test]
    fn success_rate_row_is_dash_filled() {
        let text = render(&stats(), &BenchConfig::default());
        let row = text
            .lines()
            .find(|l| l.starts_with("Success Rate"))
            .unwrap_or("");

        assert!(row.contains("83.33%"));
        assert_eq!(row.matches(" -").count(), 3, "row: {row}");
    }
}
