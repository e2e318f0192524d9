use anyhow::Context as _;

use owbench_core::{BenchConfig, InvokeMode, WhiskClient, aggregate, default_payload, run_bench};

use crate::cli::Cli;
use crate::output;
use crate::run_error::RunError;

pub async fn run(args: Cli) -> Result<(), RunError> {
    if args.num_runs == 0 || args.num_invocations == 0 {
        return Err(RunError::InvalidInput(anyhow::anyhow!(
            "nothing to measure: --num-runs and --num-invocations must both be at least 1"
        )));
    }

    let payload = resolve_payload(&args).await.map_err(RunError::InvalidInput)?;

    let cfg = BenchConfig {
        num_runs: args.num_runs,
        num_invocations: args.num_invocations,
        warmup_invocations: args.warmup_invocations,
        workers: args.workers,
        mode: if args.blocking {
            InvokeMode::Blocking
        } else {
            InvokeMode::Polling
        },
        poll_interval: args.poll_interval,
        time_limit: args.time_limit,
        function: args.function.clone(),
        payload,
    };

    let client = WhiskClient::new(args.apihost.clone(), args.authorization.clone());
    let out = output::formatter(args.output, args.verbose);

    out.print_header(&cfg, &args.apihost);
    let progress = out.progress(&cfg);

    let records = run_bench(&cfg, &client, progress.as_ref()).await;

    let stats = aggregate(&records)
        .context("no metric records were collected")
        .map_err(RunError::RuntimeError)?;

    out.print_summary(&stats, &cfg).map_err(RunError::RuntimeError)?;

    if let Some(path) = &args.output_file {
        output::csv::write(path, &stats).map_err(RunError::RuntimeError)?;
        if args.verbose {
            eprintln!("results written to {}", path.display());
        }
    }

    Ok(())
}

async fn resolve_payload(args: &Cli) -> anyhow::Result<serde_json::Value> {
    if let Some(path) = &args.input_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read payload file: {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("payload file is not valid JSON: {}", path.display()));
    }

    if let Some(inline) = &args.input_string {
        return serde_json::from_str(inline).context("--input-string is not valid JSON");
    }

    Ok(default_payload())
}
