use crate::catalog::pitch::Pitch;
use crate::error::{GameError, Result};

pub const DEFAULT_SCALE_KEY: &str = "all_notes";

/// A named, ordered pool of catalog pitches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub key: &'static str,
    pub pitches: &'static [Pitch],
}

const ALL_NOTES: [Pitch; 25] = [
    48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, // C3..B3
    60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, // C4..B4
    72, // C5
];

// C4 D4 E4 G4 A4 C5
const C_MAJOR_PENTASCALE: [Pitch; 6] = [60, 62, 64, 67, 69, 72];
// G3 A3 B3 D4 E4 G4
const G_MAJOR_PENTASCALE: [Pitch; 6] = [55, 57, 59, 62, 64, 67];
const C_MAJOR_SCALE_C4_C5: [Pitch; 8] = [60, 62, 64, 65, 67, 69, 71, 72];
const CHROMATIC_C4_C5: [Pitch; 13] = [60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72];

static SCALES: [Scale; 5] = [
    Scale {
        key: DEFAULT_SCALE_KEY,
        pitches: &ALL_NOTES,
    },
    Scale {
        key: "c_major_pentascale",
        pitches: &C_MAJOR_PENTASCALE,
    },
    Scale {
        key: "g_major_pentascale",
        pitches: &G_MAJOR_PENTASCALE,
    },
    Scale {
        key: "c_major_scale_c4_c5",
        pitches: &C_MAJOR_SCALE_C4_C5,
    },
    Scale {
        key: "chromatic_c4_c5",
        pitches: &CHROMATIC_C4_C5,
    },
];

/// All scales in selector order.
pub fn scales() -> &'static [Scale] {
    &SCALES
}

pub fn scale(key: &str) -> Result<&'static Scale> {
    SCALES
        .iter()
        .find(|s| s.key == key)
        .ok_or_else(|| GameError::UnknownScale(key.to_string()))
}

/// Look up a scale, falling back to `all_notes` for unknown keys.
pub fn scale_or_default(key: &str) -> &'static Scale {
    match scale(key) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("{}, falling back to {}", e, DEFAULT_SCALE_KEY);
            &SCALES[0]
        }
    }
}

/// Human-readable label: "c_major_pentascale" -> "C Major Pentascale".
pub fn display_name(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
