//! Feature extraction modules
//!
//! Low-level signal features and the estimators built on them:
//! - Onset-strength envelope
//! - Tempo estimation (autocorrelation over the envelope)
//! - Chromagram extraction
//! - Key estimation (pitch-class profile heuristics)
//!
//! The [`FeatureSource`] trait is the capability boundary between raw signal
//! processing and the estimators, so the estimation core stays testable with
//! synthetic features.

pub mod chroma;
pub mod key;
pub mod onset;
pub mod tempo;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Decoded mono audio with its sample rate
///
/// Read-only for the duration of an analysis and owned by the calling
/// request; nothing is shared across invocations.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioSignal {
    /// Create a signal from decoded samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Signal duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Onset/beat-strength representation: one envelope value per analysis frame
#[derive(Debug, Clone)]
pub struct BeatStrengthSeries {
    /// Non-negative envelope values, one per frame
    pub values: Vec<f32>,

    /// Hop size in samples between consecutive frames
    pub hop_size: usize,

    /// Sample rate of the underlying signal in Hz
    pub sample_rate: u32,
}

impl BeatStrengthSeries {
    /// Frame rate of the series in frames per second
    pub fn frame_rate(&self) -> f32 {
        if self.hop_size == 0 {
            return 0.0;
        }
        self.sample_rate as f32 / self.hop_size as f32
    }
}

/// Time-by-pitch-class energy matrix: one 12-element row per frame
pub type Chromagram = Vec<[f32; 12]>;

/// Capability boundary over low-level feature extraction
///
/// Both operations are pure functions of the decoded sample buffer and its
/// sample rate; implementations hold no per-request state.
pub trait FeatureSource {
    /// Produce the onset/beat-strength representation of the signal
    fn onset_representation(&self, signal: &AudioSignal)
        -> Result<BeatStrengthSeries, AnalysisError>;

    /// Produce the chromagram (one 12-element pitch-class row per frame)
    fn chromagram(&self, signal: &AudioSignal) -> Result<Chromagram, AnalysisError>;
}

/// Default feature source backed by the spectral extractors in this crate
#[derive(Debug, Clone)]
pub struct SpectralFeatureSource {
    config: AnalysisConfig,
}

impl SpectralFeatureSource {
    /// Create a feature source with the given analysis parameters
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl FeatureSource for SpectralFeatureSource {
    fn onset_representation(
        &self,
        signal: &AudioSignal,
    ) -> Result<BeatStrengthSeries, AnalysisError> {
        onset::onset_strength(
            &signal.samples,
            signal.sample_rate,
            self.config.frame_size,
            self.config.hop_size,
        )
    }

    fn chromagram(&self, signal: &AudioSignal) -> Result<Chromagram, AnalysisError> {
        chroma::compute_chromagram(&signal.samples, signal.sample_rate, &self.config)
    }
}
