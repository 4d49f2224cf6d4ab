//! latlonbox CLI - entry point and output handling.

mod cli;
mod config;
mod output;
#[cfg(feature = "parquet")]
mod parquet;
mod planner;

use latlonbox::error::CliError;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    match cli::parse_cli(args) {
        Ok((source, command, params)) => {
            let start = if params.perf {
                Some(std::time::Instant::now())
            } else {
                None
            };

            let (compute_plan, output_plan) = match planner::build_job(source, command, params) {
                Ok(plans) => plans,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            };

            let planner::ComputePlan {
                outcomes,
                command,
                params,
            } = compute_plan;

            let summary = match output::dispatch_output(outcomes, command, &params, &output_plan)
            {
                Ok(summary) => summary,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            };

            if params.summary {
                eprintln!(
                    "Matched {} of {} lines ({:.1}%)",
                    summary.matched,
                    summary.total,
                    summary.match_rate()
                );
            }

            if let Some(start_time) = start {
                let elapsed = start_time.elapsed();
                eprintln!(
                    "Processed {} lines in {:.3}s ({:.0} lines/sec)",
                    summary.total,
                    elapsed.as_secs_f64(),
                    summary.total as f64 / elapsed.as_secs_f64()
                );
            }
        }
        Err(CliError::Exit(message)) => {
            println!("{}", message);
        }
        Err(CliError::Message(message)) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}
