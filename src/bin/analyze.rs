//! Tempo/key analysis CLI
//!
//! Single file: emits the success record on stdout, or the failure record on
//! stderr with a non-zero exit status, so callers can branch on the channel
//! and shape alone. Multiple files: analyzes in parallel and emits one JSON
//! record per line.

use beatkey::{analyze_file, AnalysisConfig, FailureReport, SuccessReport};
use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate tempo and musical key of audio files")]
struct Args {
    /// Audio file(s) to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Minimum BPM to consider
    #[arg(long, default_value_t = 60.0)]
    min_bpm: f32,

    /// Maximum BPM to consider
    #[arg(long, default_value_t = 180.0)]
    max_bpm: f32,

    /// Parallel workers for batch mode (default: CPU threads - 1)
    #[arg(long)]
    jobs: Option<usize>,
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = AnalysisConfig {
        min_bpm: args.min_bpm,
        max_bpm: args.max_bpm,
        ..AnalysisConfig::default()
    };

    if args.files.len() == 1 {
        return match analyze_file(&args.files[0], config) {
            Ok(result) => {
                let report = SuccessReport::from_result(&result);
                println!("{}", serde_json::to_string(&report).expect("serialize report"));
                ExitCode::SUCCESS
            }
            Err(e) => {
                let report = FailureReport::new(&e);
                eprintln!("{}", serde_json::to_string(&report).expect("serialize report"));
                ExitCode::FAILURE
            }
        };
    }

    // Batch mode: parallelism is across files, each analysis stays
    // single-threaded.
    let jobs = args.jobs.unwrap_or_else(default_jobs).max(1);
    log::debug!("Batch: {} files, jobs={}", args.files.len(), jobs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("failed to build rayon thread pool");

    let outcomes: Vec<_> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| (path.display().to_string(), analyze_file(path, config.clone())))
            .collect()
    });

    let mut failures = 0usize;
    for (file, outcome) in &outcomes {
        match outcome {
            Ok(result) => {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": file,
                        "bpm": result.bpm,
                        "key": result.key.name(),
                    })
                );
            }
            Err(e) => {
                failures += 1;
                println!(
                    "{}",
                    serde_json::json!({
                        "file": file,
                        "bpm": null,
                        "key": null,
                        "error": e.to_string(),
                    })
                );
            }
        }
    }

    eprintln!("Done: ok={}/{}", outcomes.len() - failures, outcomes.len());

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
