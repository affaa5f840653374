//! Tempo estimation from the onset-strength envelope
//!
//! Finds the dominant periodicity of the envelope with FFT-accelerated
//! autocorrelation:
//!
//! 1. Remove the envelope mean
//! 2. `ACF = IFFT(|FFT(x)|²)` (O(n log n) instead of O(n²))
//! 3. Pick the strongest lag inside the configured BPM range
//! 4. `BPM = 60 * frame_rate / lag`
//!
//! Degenerate input (an empty or flat envelope, e.g. from a silent track)
//! yields the estimator default of 0.0 BPM instead of an error: a tempo
//! value is produced for every well-formed request.

use super::BeatStrengthSeries;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Tempo estimate in beats per minute, before rounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEstimate {
    /// Estimated tempo in BPM (0.0 for degenerate input)
    pub bpm: f32,
}

impl TempoEstimate {
    /// Nearest-integer BPM for reporting (round-half-away-from-zero)
    pub fn rounded(self) -> u32 {
        self.bpm.max(0.0).round() as u32
    }
}

/// Estimate the tempo of an onset-strength envelope
///
/// # Arguments
///
/// * `series` - Onset/beat-strength envelope with framing metadata
/// * `min_bpm` - Minimum BPM to consider
/// * `max_bpm` - Maximum BPM to consider
///
/// # Returns
///
/// A [`TempoEstimate`]; 0.0 BPM when the envelope carries no usable
/// periodicity (empty, flat, or no autocorrelation peak in range).
///
/// # Errors
///
/// Returns `AnalysisError::Estimation` for invalid framing metadata or an
/// invalid BPM range. Well-formed degenerate input is not an error.
pub fn estimate_tempo(
    series: &BeatStrengthSeries,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<TempoEstimate, AnalysisError> {
    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm {
        return Err(AnalysisError::Estimation(format!(
            "Invalid BPM range: [{:.1}, {:.1}]",
            min_bpm, max_bpm
        )));
    }

    if series.hop_size == 0 || series.sample_rate == 0 {
        return Err(AnalysisError::Estimation(
            "Invalid envelope framing: hop size and sample rate must be > 0".to_string(),
        ));
    }

    log::debug!(
        "Estimating tempo: {} frames, frame_rate={:.2} Hz, range=[{:.1}, {:.1}] BPM",
        series.values.len(),
        series.frame_rate(),
        min_bpm,
        max_bpm
    );

    // Degenerate input: nothing to correlate.
    if series.values.len() < 4 {
        log::debug!("Envelope too short for autocorrelation, using default tempo");
        return Ok(TempoEstimate { bpm: 0.0 });
    }

    let mean = series.values.iter().sum::<f32>() / series.values.len() as f32;
    let spread = series
        .values
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0f32, f32::max);
    if spread <= EPSILON {
        log::debug!("Flat envelope (silent signal), using default tempo");
        return Ok(TempoEstimate { bpm: 0.0 });
    }

    let signal: Vec<f32> = series.values.iter().map(|v| v - mean).collect();
    let acf = autocorrelation_fft(&signal);

    // Lag bounds from the BPM range: BPM = 60 * frame_rate / lag.
    let frame_rate = series.frame_rate();
    let lag_min = ((60.0 * frame_rate) / max_bpm).ceil().max(1.0) as usize;
    let lag_max = (((60.0 * frame_rate) / min_bpm).floor() as usize).min(acf.len().saturating_sub(1));

    if lag_min > lag_max {
        log::warn!(
            "No usable lag range [{}, {}] for envelope of {} frames",
            lag_min,
            lag_max,
            series.values.len()
        );
        return Ok(TempoEstimate { bpm: 0.0 });
    }

    // Strongest lag wins; strict comparison keeps the lowest lag on ties.
    let mut best_lag = lag_min;
    let mut best_value = acf[lag_min];
    for (lag, &value) in acf.iter().enumerate().take(lag_max + 1).skip(lag_min + 1) {
        if value > best_value {
            best_lag = lag;
            best_value = value;
        }
    }

    if best_value <= EPSILON {
        log::debug!("No autocorrelation peak above noise floor, using default tempo");
        return Ok(TempoEstimate { bpm: 0.0 });
    }

    let bpm = 60.0 * frame_rate / best_lag as f32;
    log::debug!("Best lag {} -> {:.2} BPM", best_lag, bpm);

    Ok(TempoEstimate { bpm })
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity `ACF = IFFT(|FFT(signal)|²)` with zero-padding to the
/// next power of two past 2n.
fn autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    buffer[..n].iter().map(|x| x.re * scale).collect()
}
