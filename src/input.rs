use serde::{Deserialize, Serialize};

use crate::catalog::pitch::Pitch;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

/// Discrete key events from a MIDI device or the on-screen keyboard.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    NoteOn { pitch: Pitch, velocity: u8 },
    NoteOff { pitch: Pitch },
}

/// Decode a raw MIDI channel message. Note-on with velocity 0 is a release.
/// Messages on every channel are accepted; anything else yields `None`.
pub fn parse_midi_message(data: &[u8]) -> Option<InputEvent> {
    let &[status, pitch, velocity, ..] = data else {
        return None;
    };
    match status & 0xF0 {
        NOTE_ON if velocity > 0 => Some(InputEvent::NoteOn { pitch, velocity }),
        NOTE_ON | NOTE_OFF => Some(InputEvent::NoteOff { pitch }),
        _ => None,
    }
}
