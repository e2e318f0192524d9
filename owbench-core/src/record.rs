use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

/// Raw outcome of one invocation: the terminal response plus the elapsed time
/// observed by the caller. Produced and consumed within a single invocation.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub status: u16,
    pub body: Bytes,
    pub client_elapsed: Duration,
}

/// Normalized per-invocation measurement. All durations are milliseconds as
/// reported by the platform (`initTime`/`waitTime`/`duration` annotations) or
/// measured by the client. Numeric fields are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRecord {
    pub init_time_ms: f64,
    pub wait_time_ms: f64,
    pub duration_ms: f64,
    pub client_elapsed_ms: f64,
    pub success: bool,
}

impl MetricRecord {
    /// The record a failed or unparseable invocation degrades to.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            init_time_ms: 0.0,
            wait_time_ms: 0.0,
            duration_ms: 0.0,
            client_elapsed_ms: 0.0,
            success: false,
        }
    }
}
