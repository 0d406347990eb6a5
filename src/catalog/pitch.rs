use crate::error::{GameError, Result};

/// MIDI note number. The playable catalog spans C3 (48) to C5 (72).
pub type Pitch = u8;

pub const LOWEST_PITCH: Pitch = 48;
pub const HIGHEST_PITCH: Pitch = 72;

/// Spawned when a level or scale resolves to nothing playable.
pub const SAFE_DEFAULT_PITCH: Pitch = 60;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn in_catalog(pitch: Pitch) -> bool {
    (LOWEST_PITCH..=HIGHEST_PITCH).contains(&pitch)
}

/// Every catalog pitch in ascending order.
pub fn all_pitches() -> impl Iterator<Item = Pitch> {
    LOWEST_PITCH..=HIGHEST_PITCH
}

/// Canonical (sharp-spelled) name of a catalog pitch, e.g. 61 -> "C#4".
pub fn name_of(pitch: Pitch) -> Result<String> {
    if !in_catalog(pitch) {
        return Err(GameError::UnknownPitch(pitch));
    }
    let name = NOTE_NAMES[(pitch % 12) as usize];
    let octave = pitch as i32 / 12 - 1;
    Ok(format!("{}{}", name, octave))
}

/// Parse a note name like "C4", "F#3" or "Bb3" into a catalog pitch.
pub fn pitch_of(name: &str) -> Result<Pitch> {
    let unknown = || GameError::UnknownNoteName(name.to_string());

    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let step = chars.next().ok_or_else(unknown)?.to_ascii_uppercase();
    let rest = chars.as_str();

    let base = match step {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(unknown()),
    };

    let (alter, octave_str) = if let Some(stripped) = rest.strip_prefix('#') {
        (1, stripped)
    } else if let Some(stripped) = rest.strip_prefix('b') {
        (-1, stripped)
    } else {
        (0, rest)
    };

    let octave: i32 = octave_str.parse().map_err(|_| unknown())?;
    let midi = (octave + 1) * 12 + base + alter;

    u8::try_from(midi)
        .ok()
        .filter(|p| in_catalog(*p))
        .ok_or_else(unknown)
}

/// Equal-tempered frequency in Hz, A4 = 440.
pub fn frequency_of(pitch: Pitch) -> f64 {
    440.0 * 2f64.powf((pitch as f64 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_of() {
        assert_eq!(name_of(48).unwrap(), "C3");
        assert_eq!(name_of(60).unwrap(), "C4");
        assert_eq!(name_of(61).unwrap(), "C#4");
        assert_eq!(name_of(72).unwrap(), "C5");
    }

    #[test]
    fn test_name_of_out_of_range() {
        assert_eq!(name_of(47), Err(GameError::UnknownPitch(47)));
        assert_eq!(name_of(73), Err(GameError::UnknownPitch(73)));
    }

    #[test]
    fn test_pitch_of() {
        assert_eq!(pitch_of("C4").unwrap(), 60);
        assert_eq!(pitch_of("A3").unwrap(), 57);
        assert_eq!(pitch_of("F#4").unwrap(), 66);
        assert_eq!(pitch_of("Db4").unwrap(), 61);
        assert_eq!(pitch_of("c5").unwrap(), 72);
    }

    #[test]
    fn test_pitch_of_rejects_garbage() {
        for bad in ["", "H4", "C", "C#x", "C6", "B2", "Cb3"] {
            assert!(
                matches!(pitch_of(bad), Err(GameError::UnknownNoteName(_))),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_every_pitch_has_one_name() {
        let count = all_pitches().count();
        assert_eq!(count, 25);
        for pitch in all_pitches() {
            let name = name_of(pitch).unwrap();
            assert_eq!(pitch_of(&name).unwrap(), pitch);
        }
    }

    #[test]
    fn test_frequency_of() {
        assert!((frequency_of(69) - 440.0).abs() < 1e-9);
        assert!((frequency_of(60) - 261.6256).abs() < 0.001);
    }
}
