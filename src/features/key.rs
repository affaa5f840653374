//! Key estimation from the chromagram
//!
//! Averages the chromagram across time into a pitch-class profile, picks the
//! dominant pitch class, and decides mode by comparing the relative third
//! scale degrees above the dominant: a stronger minor third (3 semitones up)
//! than major third (4 semitones up) classifies the key as minor.
//!
//! Every step is a total pure function: degenerate input (a silent or flat
//! profile) resolves deterministically through the tie-break rules instead
//! of raising an error.

use super::Chromagram;
use crate::analysis::result::{Key, PitchClass};

/// Semitone offset from the dominant pitch class to its candidate minor third
const MINOR_THIRD: usize = 3;

/// Semitone offset from the dominant pitch class to its candidate major third
const MAJOR_THIRD: usize = 4;

/// Time-averaged pitch-class energy profile, indexed C = 0 through B = 11
pub type PitchClassProfile = [f32; 12];

/// Average chromagram energy across the time axis
///
/// An empty chromagram averages to the all-zero profile.
pub fn average_profile(chromagram: &Chromagram) -> PitchClassProfile {
    let mut profile = [0.0f32; 12];
    if chromagram.is_empty() {
        return profile;
    }

    for row in chromagram {
        for (acc, v) in profile.iter_mut().zip(row.iter()) {
            *acc += v;
        }
    }

    let inv = 1.0 / chromagram.len() as f32;
    for v in profile.iter_mut() {
        *v *= inv;
    }
    profile
}

/// Estimate the key of a pitch-class profile
///
/// The dominant pitch class is the profile argmax; on ties the lowest index
/// wins. Mode is minor iff the energy at the minor third above the dominant
/// strictly exceeds the energy at the major third (both wrapping modulo 12);
/// an exact tie classifies as major.
pub fn estimate_key(profile: &PitchClassProfile) -> Key {
    // First occurrence of the maximum wins.
    let mut dominant = 0usize;
    for (i, &v) in profile.iter().enumerate().skip(1) {
        if v > profile[dominant] {
            dominant = i;
        }
    }

    let minor_third = profile[(dominant + MINOR_THIRD) % 12];
    let major_third = profile[(dominant + MAJOR_THIRD) % 12];

    let tonic = PitchClass::from_index(dominant);
    if minor_third > major_third {
        Key::Minor(tonic)
    } else {
        Key::Major(tonic)
    }
}

/// Estimate the key directly from a chromagram
pub fn estimate_key_from_chromagram(chromagram: &Chromagram) -> Key {
    let profile = average_profile(chromagram);
    let key = estimate_key(&profile);
    log::debug!(
        "Key estimate from {} chroma frames: {}",
        chromagram.len(),
        key.name()
    );
    key
}
