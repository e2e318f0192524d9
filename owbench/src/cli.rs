use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("duration cannot be empty (expected e.g. 30s, 1ms, 1m)".to_string());
    }

    let number_end = s
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(s.len(), |(idx, _)| idx);

    if number_end == 0 {
        return Err(format!("invalid duration '{s}' (expected e.g. 30s, 1ms, 1m)"));
    }

    let (number_str, unit_str) = s.split_at(number_end);
    let value: u64 = number_str
        .parse()
        .map_err(|_| format!("invalid duration '{s}' (expected e.g. 30s, 1ms, 1m)"))?;

    match unit_str.trim() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(value)),
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => {
            Ok(Duration::from_millis(value))
        }
        "us" | "usec" | "usecs" | "microsecond" | "microseconds" => {
            Ok(Duration::from_micros(value))
        }
        "m" | "min" | "mins" | "minute" | "minutes" => {
            let secs = value
                .checked_mul(60)
                .ok_or_else(|| format!("duration '{s}' is too large"))?;
            Ok(Duration::from_secs(secs))
        }
        _ => Err(format!("invalid duration '{s}' (expected e.g. 30s, 1ms, 1m)")),
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable results table.
    HumanReadable,
    /// Emit JSON progress and summary lines (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "owbench",
    author,
    version,
    about = "Sequential benchmark driver for OpenWhisk-style FaaS actions",
    long_about = "owbench invokes a function on an OpenWhisk-style FaaS control plane a configured number of times (blocking, or submit-then-poll), extracts initTime/waitTime/duration from the activation records, and reports mean/min/max/stdev per metric plus an overall success rate.\n\nInvocations are strictly sequential; warm-up invocations are executed first and discarded.",
    after_help = "Examples:\n  owbench -f noop -a \"Basic ...\"\n  owbench -f hello -b -n 3 -i 50 -w 5\n  owbench -f echo -s '{\"msg\":\"hi\"}' -o results.csv\n  owbench -f noop --output json -A http://localhost:3233/api/v1"
)]
pub struct Cli {
    /// Number of benchmark runs
    #[arg(short = 'n', long, default_value_t = 1)]
    pub num_runs: u32,

    /// Number of invocations per run
    #[arg(short = 'i', long, default_value_t = 100)]
    pub num_invocations: u32,

    /// Number of warm-up invocations (executed first, discarded)
    #[arg(short = 'w', long, default_value_t = 1)]
    pub warmup_invocations: u32,

    /// Worker count forwarded to the platform (burst invocations); does not
    /// parallelize the benchmark itself
    #[arg(short = 'W', long, default_value_t = 1)]
    pub workers: u32,

    /// Name of the function (action) to benchmark
    #[arg(short = 'f', long, default_value = "noop")]
    pub function: String,

    /// Use a single blocking request per invocation instead of submit + poll
    #[arg(short = 'b', long)]
    pub blocking: bool,

    /// Upper bound per invocation (request timeout / poll deadline)
    #[arg(short = 't', long, value_parser = parse_duration, default_value = "30s")]
    pub time_limit: Duration,

    /// Sleep between activation polls in non-blocking mode
    #[arg(short = 'T', long, value_parser = parse_duration, default_value = "1ms")]
    pub poll_interval: Duration,

    /// Read the invocation payload (JSON) from a file
    #[arg(short = 'I', long, conflicts_with = "input_string")]
    pub input_file: Option<PathBuf>,

    /// Inline invocation payload (JSON)
    #[arg(short = 's', long)]
    pub input_string: Option<String>,

    /// Write aggregated results to a CSV file
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Base URL of the FaaS control plane API
    #[arg(
        short = 'A',
        long,
        env = "OWBENCH_APIHOST",
        default_value = "http://172.17.0.1:3233/api/v1"
    )]
    pub apihost: String,

    /// Authorization header value (e.g. "Basic <credentials>")
    #[arg(short = 'a', long, env = "OWBENCH_AUTH", hide_env_values = true)]
    pub authorization: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Print the configuration and per-invocation outcomes
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
