//! Music-video rendering CLI
//!
//! Analyzes a track, muxes it with a still image through the external
//! encoder, and emits one combined metadata record. Failures at any stage
//! go to stderr with a non-zero exit status.

use beatkey::video::VideoEncoder;
use beatkey::{analyze_file, AnalysisConfig, FailureReport};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a still-image music video with tempo/key metadata"
)]
struct Args {
    /// Audio track to analyze and mux
    audio: PathBuf,

    /// Still image looped over the track
    image: PathBuf,

    /// Output video path (overwritten if present)
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let analysis = match analyze_file(&args.audio, AnalysisConfig::default()) {
        Ok(result) => result,
        Err(e) => {
            let report = FailureReport::new(&e);
            eprintln!("{}", serde_json::to_string(&report).expect("serialize report"));
            return ExitCode::FAILURE;
        }
    };

    let encoder = match VideoEncoder::new() {
        Ok(encoder) => encoder,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::json!({ "success": false, "error": e.to_string() })
            );
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = encoder.encode(&args.audio, &args.image, &args.output) {
        eprintln!(
            "{}",
            serde_json::json!({ "success": false, "error": e.to_string() })
        );
        return ExitCode::FAILURE;
    }

    println!(
        "{}",
        serde_json::json!({
            "success": true,
            "video_path": args.output.display().to_string(),
            "bpm": analysis.bpm,
            "key": analysis.key.name(),
        })
    );
    ExitCode::SUCCESS
}
