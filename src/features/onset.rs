//! Onset-strength envelope extraction
//!
//! Reduces the signal to a frame-rate series of rhythmic onset intensity:
//!
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Positive first difference: `S[n] = max(0, E[n] - E[n-1])`
//!
//! The result is kept as an envelope rather than a peak list because the
//! tempo stage consumes the raw series.

use super::BeatStrengthSeries;
use crate::error::AnalysisError;

/// Compute the onset-strength envelope of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples, nominally in [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - Frame size for RMS analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
///
/// # Returns
///
/// A [`BeatStrengthSeries`] with one non-negative value per frame. A signal
/// shorter than one frame yields an empty series (the tempo stage treats an
/// empty envelope as degenerate input, not an error).
///
/// # Errors
///
/// Returns `AnalysisError::Extraction` for a zero-length signal or invalid
/// framing parameters.
pub fn onset_strength(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<BeatStrengthSeries, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::Extraction(
            "zero-length signal".to_string(),
        ));
    }

    if frame_size == 0 {
        return Err(AnalysisError::Extraction(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::Extraction(
            "Hop size must be > 0".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::Extraction(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if samples.len() < frame_size {
        log::warn!(
            "Signal ({} samples) shorter than one frame ({}), returning empty envelope",
            samples.len(),
            frame_size
        );
        return Ok(BeatStrengthSeries {
            values: Vec::new(),
            hop_size,
            sample_rate,
        });
    }

    log::debug!(
        "Computing onset strength: {} samples, frame={}, hop={}",
        samples.len(),
        frame_size,
        hop_size
    );

    // Step 1: RMS energy per frame
    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut frame_energies = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        let start = i * hop_size;
        let end = (start + frame_size).min(samples.len());
        let sum_sq: f32 = samples[start..end].iter().map(|&x| x * x).sum();
        let rms = (sum_sq / (end - start) as f32).sqrt();
        frame_energies.push(rms);
    }

    // Step 2: Positive energy derivative
    let values: Vec<f32> = frame_energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();

    log::debug!("Onset envelope: {} frames", values.len());

    Ok(BeatStrengthSeries {
        values,
        hop_size,
        sample_rate,
    })
}
