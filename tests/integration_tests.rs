//! Integration tests for the tempo/key analysis pipeline
//!
//! Fixtures are synthesized in-memory (kick patterns for tempo, chords for
//! key) so the suite stays hermetic; the file-based path is exercised through
//! a WAV written on the fly.

use beatkey::{analyze_audio, analyze_file, AnalysisConfig, AnalysisError, FailureReport};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};

/// Generate a 4-on-floor kick pattern at the given BPM
fn generate_kick_pattern(
    duration_seconds: f32,
    bpm: f32,
    sample_rate: f32,
    kick_duration_ms: f32,
) -> Vec<f32> {
    let num_samples = (duration_seconds * sample_rate) as usize;
    let mut samples = vec![0.0f32; num_samples];

    let beat_interval = (60.0 / bpm * sample_rate) as usize;
    let kick_samples = (kick_duration_ms / 1000.0 * sample_rate) as usize;

    // Exponential decay envelope per kick
    let kick_envelope: Vec<f32> = (0..kick_samples)
        .map(|i| (-(i as f32 / kick_samples as f32) * 5.0).exp())
        .collect();

    let mut pos = 0;
    while pos < num_samples {
        let end = (pos + kick_samples).min(num_samples);
        for (i, &amp) in kick_envelope[..(end - pos)].iter().enumerate() {
            samples[pos + i] = amp * 0.8;
        }
        pos += beat_interval;
    }

    samples
}

/// Generate a sine tone at the given frequency and amplitude
fn tone(freq: f32, amplitude: f32, sample_rate: u32, duration_seconds: f32) -> Vec<f32> {
    let num_samples = (duration_seconds * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

/// Mix several equally-long signals by summation
fn mix(parts: &[Vec<f32>]) -> Vec<f32> {
    let len = parts.iter().map(|p| p.len()).min().unwrap_or(0);
    let mut out = vec![0.0f32; len];
    for part in parts {
        for (acc, &v) in out.iter_mut().zip(part.iter()) {
            *acc += v;
        }
    }
    out
}

fn temp_wav_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("beatkey_{}_{}.wav", name, std::process::id()))
}

/// Write mono f32 samples as a 16-bit WAV file
fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_sample(v).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

#[test]
fn test_tempo_120bpm_kick_pattern() {
    let samples = generate_kick_pattern(8.0, 120.0, 44100.0, 150.0);
    let result = analyze_audio(&samples, 44100, AnalysisConfig::default())
        .expect("analysis should succeed");

    assert!(
        (result.bpm as i64 - 120).abs() <= 2,
        "BPM should be close to 120, got {}",
        result.bpm
    );
    assert!(result.metadata.duration_seconds > 7.0 && result.metadata.duration_seconds < 9.0);
    assert_eq!(result.metadata.sample_rate, 44100);
}

#[test]
fn test_key_c_major_chord() {
    // C4/E4/G4 with the root clearly dominant: dominant class C, major third
    // well above the (empty) minor third.
    let samples = mix(&[
        tone(261.63, 0.5, 44100, 5.0),
        tone(329.63, 0.3, 44100, 5.0),
        tone(392.00, 0.4, 44100, 5.0),
    ]);
    let result = analyze_audio(&samples, 44100, AnalysisConfig::default())
        .expect("analysis should succeed");

    assert_eq!(result.key.name(), "C");
}

#[test]
fn test_key_a_minor_chord() {
    // A4/C5/E5: dominant class A with a strong minor third (C) and nothing
    // on the major third (C#).
    let samples = mix(&[
        tone(440.00, 0.5, 44100, 5.0),
        tone(523.25, 0.4, 44100, 5.0),
        tone(659.25, 0.3, 44100, 5.0),
    ]);
    let result = analyze_audio(&samples, 44100, AnalysisConfig::default())
        .expect("analysis should succeed");

    assert_eq!(result.key.name(), "Am");
}

#[test]
fn test_silent_track_degenerate_defaults() {
    // Silence is a valid input: default tempo, key resolved by tie-breaks.
    let samples = vec![0.0f32; 44100 * 5];
    let result = analyze_audio(&samples, 44100, AnalysisConfig::default())
        .expect("silent audio should still analyze");

    assert_eq!(result.bpm, 0);
    assert_eq!(result.key.name(), "C");
}

#[test]
fn test_analysis_is_idempotent() {
    let samples = mix(&[
        generate_kick_pattern(6.0, 128.0, 44100.0, 100.0),
        tone(261.63, 0.2, 44100, 6.0),
    ]);

    let first = analyze_audio(&samples, 44100, AnalysisConfig::default()).unwrap();
    let second = analyze_audio(&samples, 44100, AnalysisConfig::default()).unwrap();

    assert_eq!(first.bpm, second.bpm);
    assert_eq!(first.key, second.key);
}

#[test]
fn test_empty_signal_is_extraction_failure() {
    let result = analyze_audio(&[], 44100, AnalysisConfig::default());
    assert!(matches!(result, Err(AnalysisError::Extraction(_))));
}

#[test]
fn test_unreadable_file_yields_failure_shape() {
    let missing = Path::new("/nonexistent/beatkey/no_such_track.mp3");
    let err = analyze_file(missing, AnalysisConfig::default())
        .expect_err("missing file must fail");
    assert!(matches!(err, AnalysisError::Decode(_)));

    // The wire record carries explicit nulls and a non-empty message.
    let json = serde_json::to_value(FailureReport::new(&err)).unwrap();
    assert!(json["bpm"].is_null());
    assert!(json["key"].is_null());
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[test]
fn test_wav_file_end_to_end() {
    let path = temp_wav_path("kick120");
    let samples = generate_kick_pattern(8.0, 120.0, 44100.0, 150.0);
    write_wav(&path, &samples, 44100);

    let result = analyze_file(&path, AnalysisConfig::default());
    std::fs::remove_file(&path).ok();

    let result = result.expect("wav analysis should succeed");
    assert!(
        (result.bpm as i64 - 120).abs() <= 2,
        "BPM should be close to 120, got {}",
        result.bpm
    );
    assert!(result.metadata.duration_seconds > 7.0 && result.metadata.duration_seconds < 9.0);
}

#[test]
fn test_bpm_range_narrows_candidates() {
    // The same 120 BPM pattern analyzed with a range that excludes 120
    // should settle on a related periodicity inside the range.
    let samples = generate_kick_pattern(8.0, 120.0, 44100.0, 150.0);
    let config = AnalysisConfig {
        min_bpm: 40.0,
        max_bpm: 100.0,
        ..AnalysisConfig::default()
    };
    let result = analyze_audio(&samples, 44100, config).expect("analysis should succeed");
    assert!(
        result.bpm >= 40 && result.bpm <= 101,
        "BPM {} should fall inside the configured range",
        result.bpm
    );
}
