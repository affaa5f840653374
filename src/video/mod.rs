//! Video output modules
//!
//! Muxing an audio track with a still image through an external encoder.

pub mod encoder;

pub use encoder::{EncoderConfig, EncoderError, VideoEncoder};
