#![forbid(unsafe_code)]

mod config;
mod driver;
mod extract;
mod record;
mod stats;
mod whisk;

pub use config::{BenchConfig, InvokeMode, default_payload};
pub use driver::{BenchPhase, ProgressFn, ProgressUpdate, run_bench};
pub use extract::extract;
pub use record::{InvocationResult, MetricRecord};
pub use stats::{AggregateStats, MetricStats, StatsError, aggregate};
pub use whisk::{InvokeError, Invoker, Result, WhiskClient};
