//! Result assembly modules
//!
//! Final result and wire-record types produced by the pipeline.

pub mod result;
