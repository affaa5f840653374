//! Analysis result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the twelve pitch classes of the equal-tempered scale
///
/// Variants are declared in the fixed cyclic order starting at C, so the
/// discriminant of each variant is its pitch-class index (C = 0, ..., B = 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    /// C (index 0)
    C,
    /// C# (index 1)
    Cs,
    /// D (index 2)
    D,
    /// Eb (index 3)
    Eb,
    /// E (index 4)
    E,
    /// F (index 5)
    F,
    /// F# (index 6)
    Fs,
    /// G (index 7)
    G,
    /// Ab (index 8)
    Ab,
    /// A (index 9)
    A,
    /// Bb (index 10)
    Bb,
    /// B (index 11)
    B,
}

impl PitchClass {
    /// All pitch classes in index order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Pitch class for an index, wrapping modulo 12
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Pitch-class index (C = 0, ..., B = 11)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical note name ("C", "C#", "D", "Eb", ...)
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    /// Parse a canonical note name back to its pitch class
    ///
    /// Only the exact spellings produced by [`PitchClass::name`] are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|pc| pc.name() == name)
    }

    /// Pitch class `semitones` above this one, wrapping around the cycle
    pub fn transpose(self, semitones: usize) -> Self {
        Self::from_index(self.index() + semitones)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Major/minor mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

/// Musical key: a tonic pitch class plus major/minor mode
///
/// Computed once per analysis request and immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key
    Major(PitchClass),
    /// Minor key
    Minor(PitchClass),
}

impl Key {
    /// Tonic pitch class of the key
    pub fn tonic(self) -> PitchClass {
        match self {
            Key::Major(pc) | Key::Minor(pc) => pc,
        }
    }

    /// Mode of the key
    pub fn mode(self) -> Mode {
        match self {
            Key::Major(_) => Mode::Major,
            Key::Minor(_) => Mode::Minor,
        }
    }

    /// Key name in musical notation
    ///
    /// Major keys render as the note name only, minor keys carry an "m"
    /// suffix.
    ///
    /// # Example
    ///
    /// ```
    /// use beatkey::{Key, PitchClass};
    ///
    /// assert_eq!(Key::Major(PitchClass::C).name(), "C");
    /// assert_eq!(Key::Major(PitchClass::Fs).name(), "F#");
    /// assert_eq!(Key::Minor(PitchClass::D).name(), "Dm");
    /// assert_eq!(Key::Minor(PitchClass::Bb).name(), "Bbm");
    /// ```
    pub fn name(self) -> String {
        match self {
            Key::Major(pc) => pc.name().to_string(),
            Key::Minor(pc) => format!("{}m", pc.name()),
        }
    }

    /// Parse a key name produced by [`Key::name`]
    ///
    /// Returns `None` for anything outside the 24 canonical spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(stem) = name.strip_suffix('m') {
            PitchClass::from_name(stem).map(Key::Minor)
        } else {
            PitchClass::from_name(name).map(Key::Major)
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Major(pc) => f.write_str(pc.name()),
            Key::Minor(pc) => write!(f, "{}m", pc.name()),
        }
    }
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,
}

/// Complete analysis result for one input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Tempo estimate, rounded to the nearest integer BPM
    pub bpm: u32,

    /// Detected key
    pub key: Key,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

/// Wire-shaped success record
///
/// Serialized onto the success channel as `{"bpm": <int>, "key": "<name>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessReport {
    /// Rounded tempo in beats per minute
    pub bpm: u32,
    /// Key name in musical notation
    pub key: String,
}

impl SuccessReport {
    /// Build the wire record from an analysis result
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            bpm: result.bpm,
            key: result.key.name(),
        }
    }
}

/// Wire-shaped failure record
///
/// `bpm` and `key` serialize as explicit nulls so callers can branch on the
/// record shape alone; `error` carries a human-readable diagnostic message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    /// Always null on failure
    pub bpm: Option<u32>,
    /// Always null on failure
    pub key: Option<String>,
    /// Human-readable failure description (diagnostic-only, not stable)
    pub error: String,
}

impl FailureReport {
    /// Build the wire record from any displayable error
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            bpm: None,
            key: None,
            error: error.to_string(),
        }
    }
}
