//! # Beatkey
//!
//! Tempo and musical key estimation for automated music-video pipelines,
//! producing per-track metadata (integer BPM plus a key label such as "C" or
//! "Dm") that downstream media-assembly services use to choose timing and
//! stylistic parameters.
//!
//! ## Features
//!
//! - **Tempo**: onset-strength envelope reduced by FFT-accelerated
//!   autocorrelation to a single rounded BPM value
//! - **Key**: time-averaged chromagram profile with a relative-third
//!   major/minor heuristic
//! - **Decoding**: any Symphonia-supported container/codec, downmixed to mono
//! - **Video**: ffmpeg wrapper that muxes a track with a still image
//!
//! ## Quick Start
//!
//! ```no_run
//! use beatkey::{analyze_file, AnalysisConfig};
//! use std::path::Path;
//!
//! let result = analyze_file(Path::new("track.mp3"), AnalysisConfig::default())?;
//! println!("{} BPM, key {}", result.bpm, result.key.name());
//! # Ok::<(), beatkey::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline is invoked once per input file, synchronously, with no state
//! shared across invocations:
//!
//! ```text
//! Audio Input → Decoding → Feature Extraction → Tempo/Key Estimation → Result
//! ```
//!
//! Any stage error short-circuits into a single failure-shaped outcome; no
//! partial results are produced.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod video;

// Re-export main types
pub use analysis::result::{
    AnalysisMetadata, AnalysisResult, FailureReport, Key, Mode, PitchClass, SuccessReport,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::{AudioSignal, BeatStrengthSeries, Chromagram, FeatureSource, SpectralFeatureSource};

use features::{key, tempo};
use std::path::Path;
use std::time::Instant;

/// Analyze a decoded signal against an explicit feature source
///
/// Runs tempo and key estimation over the feature source outputs and
/// assembles one [`AnalysisResult`]. This is the assembly point the rest of
/// the crate builds on; passing a synthetic [`FeatureSource`] keeps the
/// estimators testable without audio files.
///
/// # Errors
///
/// Any stage failure short-circuits and is returned as the matching
/// [`AnalysisError`] variant; partial results are never produced.
pub fn analyze_signal<S: FeatureSource>(
    source: &S,
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    if signal.samples.is_empty() {
        return Err(AnalysisError::Extraction(
            "zero-length signal".to_string(),
        ));
    }

    if signal.sample_rate == 0 {
        return Err(AnalysisError::Extraction(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    log::debug!(
        "Starting analysis: {} samples at {} Hz",
        signal.samples.len(),
        signal.sample_rate
    );

    let onsets = source.onset_representation(signal)?;
    let tempo_estimate = tempo::estimate_tempo(&onsets, config.min_bpm, config.max_bpm)?;

    let chromagram = source.chromagram(signal)?;
    let detected_key = key::estimate_key_from_chromagram(&chromagram);

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis done: {:.2} BPM -> {}, key {}, {:.2} ms",
        tempo_estimate.bpm,
        tempo_estimate.rounded(),
        detected_key.name(),
        processing_time_ms
    );

    Ok(AnalysisResult {
        bpm: tempo_estimate.rounded(),
        key: detected_key,
        metadata: AnalysisMetadata {
            duration_seconds: signal.duration_seconds(),
            sample_rate: signal.sample_rate,
            processing_time_ms,
        },
    })
}

/// Analyze raw mono samples with the default spectral feature source
///
/// # Arguments
///
/// * `samples` - Mono audio samples, nominally in [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError` if feature extraction or estimation fails.
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let signal = AudioSignal::new(samples.to_vec(), sample_rate);
    let source = SpectralFeatureSource::new(config.clone());
    analyze_signal(&source, &signal, &config)
}

/// Decode an audio file and analyze it
///
/// # Errors
///
/// Returns `AnalysisError::Decode` if the file cannot be decoded, or the
/// downstream extraction/estimation error otherwise.
pub fn analyze_file(path: &Path, config: AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    let signal = io::decode_audio(path)?;
    let source = SpectralFeatureSource::new(config.clone());
    analyze_signal(&source, &signal, &config)
}
