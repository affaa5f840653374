//! Audio I/O modules
//!
//! Decoding to analysis-ready mono samples using Symphonia.

pub mod decoder;

pub use decoder::decode_audio;
