use std::time::Duration;

use serde_json::{Value, json};

/// How a single invocation waits for its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum InvokeMode {
    /// One synchronous request/response exchange (`blocking=true`).
    Blocking,
    /// Submit with `blocking=false`, then poll the activation until HTTP 200.
    Polling,
}

/// Immutable benchmark parameters, constructed once at startup and passed by
/// reference to the driver, client, and reporter.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub num_runs: u32,
    pub num_invocations: u32,
    pub warmup_invocations: u32,
    /// Forwarded to the platform as a query parameter; never used for local
    /// concurrency (invocations are strictly sequential).
    pub workers: u32,
    pub mode: InvokeMode,
    /// Sleep between activation polls in polling mode.
    pub poll_interval: Duration,
    /// Upper bound for a single invocation: request timeout in blocking mode,
    /// submit-to-terminal-poll bound in polling mode.
    pub time_limit: Duration,
    pub function: String,
    pub payload: Value,
}

pub fn default_payload() -> Value {
    json!({"param1": "default", "param2": "payload"})
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            num_runs: 1,
            num_invocations: 100,
            warmup_invocations: 1,
            workers: 1,
            mode: InvokeMode::Polling,
            poll_interval: Duration::from_millis(1),
            time_limit: Duration::from_secs(30),
            function: "noop".to_string(),
            payload: default_payload(),
        }
    }
}

impl BenchConfig {
    /// Total number of metric records a full benchmark produces.
    #[must_use]
    pub fn total_invocations(&self) -> u64 {
        u64::from(self.num_runs) * u64::from(self.num_invocations)
    }
}
