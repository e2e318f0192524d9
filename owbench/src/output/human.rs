use std::sync::Arc;

use owbench_core::{AggregateStats, BenchConfig, BenchPhase, ProgressFn};

mod progress;
mod table;

use progress::HumanProgress;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
    verbose: bool,
}

impl HumanReadableOutput {
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
            verbose,
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, cfg: &BenchConfig, apihost: &str) {
        println!("function: {} mode={}", cfg.function, cfg.mode);
        println!(
            "plan: warmup={} runs={} invocations_per_run={} workers={}",
            cfg.warmup_invocations, cfg.num_runs, cfg.num_invocations, cfg.workers
        );

        if self.verbose {
            println!("apihost: {apihost}");
            println!(
                "limits: time_limit={:?} poll_interval={:?}",
                cfg.time_limit, cfg.poll_interval
            );
            println!("payload: {}", cfg.payload);
        }
        println!();
    }

    fn progress(&self, cfg: &BenchConfig) -> Option<ProgressFn> {
        let progress = self.progress.clone();
        let verbose = self.verbose;
        let warmup = u64::from(cfg.warmup_invocations);
        let total = warmup + cfg.total_invocations();

        Some(Arc::new(move |u| {
            let completed = match u.phase {
                BenchPhase::WarmUp => u64::from(u.invocation),
                BenchPhase::Measuring => {
                    warmup
                        + u64::from(u.run - 1) * u64::from(u.invocations)
                        + u64::from(u.invocation)
                }
            };

            let message = match u.phase {
                BenchPhase::WarmUp => {
                    format!("warm-up {}/{}", u.invocation, u.invocations)
                }
                BenchPhase::Measuring => format!(
                    "run {}/{} inv {}/{}",
                    u.run, u.runs, u.invocation, u.invocations
                ),
            };

            if verbose {
                let outcome = match &u.error {
                    Some(err) => format!("error: {err}"),
                    None => format!(
                        "success={} duration={:.1}ms elapsed={:.1}ms",
                        u.record.success, u.record.duration_ms, u.record.client_elapsed_ms
                    ),
                };
                progress.println(format!("{} {message}: {outcome}", u.phase));
            }

            progress.update(total, completed, message);
        }))
    }

    fn print_summary(&self, stats: &AggregateStats, cfg: &BenchConfig) -> anyhow::Result<()> {
        self.progress.finish();
        print!("{}", table::render(stats, cfg));
        Ok(())
    }
}
