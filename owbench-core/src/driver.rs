use std::sync::Arc;

use crate::config::BenchConfig;
use crate::extract::extract;
use crate::record::MetricRecord;
use crate::whisk::Invoker;

pub type ProgressFn = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BenchPhase {
    WarmUp,
    Measuring,
}

/// Emitted after every completed invocation, warm-up included.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub phase: BenchPhase,
    /// 1-based run index; 0 during warm-up.
    pub run: u32,
    pub runs: u32,
    /// 1-based invocation index within the current run (or warm-up batch).
    pub invocation: u32,
    pub invocations: u32,
    pub record: MetricRecord,
    /// Set when the invocation failed before producing a response.
    pub error: Option<String>,
}

/// Executes the full benchmark: warm-up invocations (discarded) followed by
/// `num_runs` x `num_invocations` strictly sequential measured calls.
///
/// Records from all runs land in one flat list in call order; a failed
/// invocation contributes a zeroed record instead of aborting the run.
pub async fn run_bench<I: Invoker>(
    cfg: &BenchConfig,
    invoker: &I,
    progress: Option<&ProgressFn>,
) -> Vec<MetricRecord> {
    for i in 1..=cfg.warmup_invocations {
        let (record, error) = invoke_once(cfg, invoker).await;
        notify(
            progress,
            ProgressUpdate {
                phase: BenchPhase::WarmUp,
                run: 0,
                runs: cfg.num_runs,
                invocation: i,
                invocations: cfg.warmup_invocations,
                record,
                error,
            },
        );
    }

    let mut records = Vec::with_capacity(cfg.total_invocations() as usize);

    for run in 1..=cfg.num_runs {
        for i in 1..=cfg.num_invocations {
            let (record, error) = invoke_once(cfg, invoker).await;
            notify(
                progress,
                ProgressUpdate {
                    phase: BenchPhase::Measuring,
                    run,
                    runs: cfg.num_runs,
                    invocation: i,
                    invocations: cfg.num_invocations,
                    record,
                    error,
                },
            );
            records.push(record);
        }
    }

    records
}

async fn invoke_once<I: Invoker>(cfg: &BenchConfig, invoker: &I) -> (MetricRecord, Option<String>) {
    match invoker.invoke(cfg).await {
        Ok(result) => (extract(&result, cfg.mode), None),
        Err(err) => (MetricRecord::failed(), Some(err.to_string())),
    }
}

fn notify(progress: Option<&ProgressFn>, update: ProgressUpdate) {
    if let Some(f) = progress {
        f(update);
    }
}
