use serde::Serialize;

use crate::record::MetricRecord;

/// Mean/min/max/sample standard deviation for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub stdev: f64,
}

/// Flat aggregate over all collected metric records. Failed (zeroed) records
/// are included in the numeric aggregates; only `success_rate` distinguishes
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub init_time: MetricStats,
    pub wait_time: MetricStats,
    pub duration: MetricStats,
    pub client_elapsed: MetricStats,
    /// Percentage of records with `success = true`, in `[0, 100]`.
    pub success_rate: f64,
    pub samples: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("cannot aggregate an empty set of metric records")]
    Empty,
}

pub fn aggregate(records: &[MetricRecord]) -> Result<AggregateStats, StatsError> {
    if records.is_empty() {
        return Err(StatsError::Empty);
    }

    let mut init_time = Welford::default();
    let mut wait_time = Welford::default();
    let mut duration = Welford::default();
    let mut client_elapsed = Welford::default();
    let mut successes: u64 = 0;

    for r in records {
        init_time.record(r.init_time_ms);
        wait_time.record(r.wait_time_ms);
        duration.record(r.duration_ms);
        client_elapsed.record(r.client_elapsed_ms);
        if r.success {
            successes = successes.saturating_add(1);
        }
    }

    Ok(AggregateStats {
        init_time: init_time.stats(),
        wait_time: wait_time.stats(),
        duration: duration.stats(),
        client_elapsed: client_elapsed.stats(),
        success_rate: (successes as f64) / (records.len() as f64) * 100.0,
        samples: records.len() as u64,
    })
}

/// Streaming mean/variance accumulator (Welford). Sample stdev, reported as 0
/// for a singleton sample.
#[derive(Debug, Clone, Copy)]
struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for Welford {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Welford {
    fn record(&mut self, sample: f64) {
        if !sample.is_finite() {
            return;
        }

        self.count = self.count.saturating_add(1);
        let delta = sample - self.mean;
        self.mean += delta / (self.count as f64);
        let delta2 = sample - self.mean;
        self.m2 += delta * delta2;
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    fn stats(&self) -> MetricStats {
        if self.count == 0 {
            return MetricStats {
                avg: 0.0,
                min: 0.0,
                max: 0.0,
                stdev: 0.0,
            };
        }

        let stdev = if self.count >= 2 {
            (self.m2 / ((self.count - 1) as f64)).sqrt()
        } else {
            0.0
        };

        MetricStats {
            avg: self.mean,
            min: self.min,
            max: self.max,
            stdev,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn record(duration_ms: f64, success: bool) -> MetricRecord {
        MetricRecord {
            init_time_ms: duration_ms / 2.0,
            wait_time_ms: 1.0,
            duration_ms,
            client_elapsed_ms: duration_ms + 5.0,
            success,
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(aggregate(&[]), Err(StatsError::Empty));
    }

    #[test]
    fn singleton_aggregate_has_zero_stdev() {
        let stats = aggregate(&[record(100.0, true)]).unwrap();
        assert_eq!(stats.duration.avg, 100.0);
        assert_eq!(stats.duration.min, 100.0);
        assert_eq!(stats.duration.max, 100.0);
        assert_eq!(stats.duration.stdev, 0.0);
        assert_eq!(stats.success_rate, 100.0);
        assert_eq!(stats.samples, 1);
    }

    #[test]
    fn sample_stdev_matches_known_value() {
        let records = [record(1.0, true), record(2.0, true), record(3.0, true)];
        let stats = aggregate(&records).unwrap();
        assert!((stats.duration.avg - 2.0).abs() < 1e-12);
        assert!((stats.duration.stdev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn average_is_between_min_and_max_for_every_metric() {
        let records = [
            record(3.0, true),
            record(250.0, false),
            record(42.0, true),
            record(0.0, false),
        ];
        let stats = aggregate(&records).unwrap();

        for m in [
            stats.init_time,
            stats.wait_time,
            stats.duration,
            stats.client_elapsed,
        ] {
            assert!(m.min <= m.avg && m.avg <= m.max, "violated for {m:?}");
        }
    }

    #[test]
    fn success_rate_is_exact_and_bounded() {
        let records = [
            record(1.0, true),
            record(1.0, true),
            record(1.0, false),
            record(1.0, false),
            record(1.0, false),
            record(1.0, false),
        ];
        let stats = aggregate(&records).unwrap();
        assert!((stats.success_rate - 100.0 * 2.0 / 6.0).abs() < 1e-12);
        assert!((0.0..=100.0).contains(&stats.success_rate));
    }

    #[test]
    fn failed_records_pull_numeric_aggregates_down() {
        // Zeroed failures are counted in the numeric aggregates by design.
        let records = [record(100.0, true), MetricRecord::failed()];
        let stats = aggregate(&records).unwrap();
        assert_eq!(stats.duration.avg, 50.0);
        assert_eq!(stats.duration.min, 0.0);
        assert_eq!(stats.success_rate, 50.0);
    }
}
