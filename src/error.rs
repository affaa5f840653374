//! Error types for the analysis pipeline

use std::fmt;

/// Errors that can occur while producing an analysis result
///
/// One variant per pipeline stage, so callers can branch on the failure kind
/// without parsing message text. The message payloads are diagnostic-only and
/// carry no stable format.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// The input file cannot be read or decoded as audio
    Decode(String),

    /// The feature source failed to produce a valid onset representation
    /// or chromagram (e.g., corrupted or zero-length signal)
    Extraction(String),

    /// Internal computation failure during tempo or key estimation
    Estimation(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Decode(msg) => write!(f, "Decode error: {}", msg),
            AnalysisError::Extraction(msg) => write!(f, "Feature extraction error: {}", msg),
            AnalysisError::Estimation(msg) => write!(f, "Estimation error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
