//! Chromagram extraction
//!
//! Converts the signal to a time-by-pitch-class energy matrix:
//!
//! 1. Slide a Hann-windowed frame across the audio
//! 2. FFT each frame to get the magnitude spectrum
//! 3. Map each bin to its nearest equal-tempered pitch class, restricted to
//!    a bounded frequency band where fundamentals dominate
//! 4. Accumulate power (magnitude squared) per pitch class per frame
//!
//! Pitch-class mapping (12-TET, relative to the configured tuning
//! frequency): `class = (round(12 * log2(f / a4)) + 9) mod 12`, where the
//! `+9` shifts A-relative semitone counts to C-based indices.

use super::Chromagram;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;

/// Extract a chromagram from a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Framing, tuning, and band parameters
///
/// # Returns
///
/// One 12-element pitch-class energy row per STFT frame, in time order.
///
/// # Errors
///
/// Returns `AnalysisError::Extraction` if the signal is shorter than one
/// frame or the parameters are invalid.
pub fn compute_chromagram(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<Chromagram, AnalysisError> {
    let frame_size = config.frame_size;
    let hop_size = config.hop_size;

    if frame_size == 0 || hop_size == 0 {
        return Err(AnalysisError::Extraction(
            "Frame size and hop size must be > 0".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::Extraction(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if config.tuning_frequency <= 0.0 {
        return Err(AnalysisError::Extraction(format!(
            "Invalid tuning frequency: {:.1}",
            config.tuning_frequency
        )));
    }

    if samples.len() < frame_size {
        return Err(AnalysisError::Extraction(format!(
            "Signal too short for chroma analysis: {} samples (need at least {})",
            samples.len(),
            frame_size
        )));
    }

    log::debug!(
        "Extracting chromagram: {} samples at {} Hz, frame={}, hop={}",
        samples.len(),
        sample_rate,
        frame_size,
        hop_size
    );

    // Hann window coefficients
    let window: Vec<f32> = (0..frame_size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (frame_size - 1) as f32).cos()))
        .collect();

    // Bin-to-pitch-class map for the positive spectrum, band-limited
    let bin_to_class: Vec<Option<usize>> = (0..=frame_size / 2)
        .map(|bin| {
            let freq = bin as f32 * sample_rate as f32 / frame_size as f32;
            if freq < config.min_chroma_frequency || freq > config.max_chroma_frequency {
                return None;
            }
            let semitones_from_a = 12.0 * (freq / config.tuning_frequency).log2();
            let class = (semitones_from_a.round() as i32 + 9).rem_euclid(12);
            Some(class as usize)
        })
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut frames: Chromagram = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        let mut buffer: Vec<Complex<f32>> = samples[start..start + frame_size]
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        fft.process(&mut buffer);

        let mut row = [0.0f32; 12];
        for (bin, class) in bin_to_class.iter().enumerate() {
            if let Some(class) = class {
                row[*class] += buffer[bin].norm_sqr();
            }
        }
        frames.push(row);
    }

    log::debug!("Chromagram: {} frames", frames.len());

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: u32, duration_seconds: f32) -> Vec<f32> {
        let num_samples = (duration_seconds * sample_rate as f32) as usize;
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    fn averaged(chromagram: &Chromagram) -> [f32; 12] {
        let mut profile = [0.0f32; 12];
        for row in chromagram {
            for (acc, v) in profile.iter_mut().zip(row.iter()) {
                *acc += v;
            }
        }
        profile
    }

    #[test]
    fn test_a4_tone_dominates_class_a() {
        let samples = tone(440.0, 44100, 2.0);
        let chromagram =
            compute_chromagram(&samples, 44100, &AnalysisConfig::default()).unwrap();
        assert!(!chromagram.is_empty());

        let profile = averaged(&chromagram);
        let dominant = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(dominant, 9, "440 Hz should land on pitch class A (9)");
    }

    #[test]
    fn test_c4_tone_dominates_class_c() {
        let samples = tone(261.63, 44100, 2.0);
        let chromagram =
            compute_chromagram(&samples, 44100, &AnalysisConfig::default()).unwrap();

        let profile = averaged(&chromagram);
        let dominant = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(dominant, 0, "261.63 Hz should land on pitch class C (0)");
    }

    #[test]
    fn test_frame_count() {
        let config = AnalysisConfig::default();
        let samples = vec![0.1f32; 44100];
        let chromagram = compute_chromagram(&samples, 44100, &config).unwrap();
        let expected = (samples.len() - config.frame_size) / config.hop_size + 1;
        assert_eq!(chromagram.len(), expected);
    }

    #[test]
    fn test_silence_yields_zero_rows() {
        let samples = vec![0.0f32; 44100];
        let chromagram =
            compute_chromagram(&samples, 44100, &AnalysisConfig::default()).unwrap();
        assert!(chromagram
            .iter()
            .all(|row| row.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_short_signal_is_extraction_error() {
        let samples = vec![0.1f32; 1000];
        let result = compute_chromagram(&samples, 44100, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::Extraction(_))));
    }

    #[test]
    fn test_invalid_parameters() {
        let samples = vec![0.1f32; 44100];
        let config = AnalysisConfig {
            tuning_frequency: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(compute_chromagram(&samples, 44100, &config).is_err());
        assert!(compute_chromagram(&samples, 0, &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_rows_are_non_negative() {
        let samples = tone(330.0, 44100, 1.0);
        let chromagram =
            compute_chromagram(&samples, 44100, &AnalysisConfig::default()).unwrap();
        assert!(chromagram
            .iter()
            .all(|row| row.iter().all(|&v| v >= 0.0)));
    }
}
