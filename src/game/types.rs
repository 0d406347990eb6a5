use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::pitch::Pitch;
use crate::error::GameError;

pub type NoteId = u64;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HitQuality {
    Perfect,
    Great,
    Good,
}

impl HitQuality {
    pub fn is_streak_quality(self) -> bool {
        matches!(self, HitQuality::Perfect | HitQuality::Great)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoteState {
    InFlight,
    Hit(HitQuality),
    Missed,
}

/// One falling target.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub pitch: Pitch,
    pub vertical_position: f64,
    pub state: NoteState,
    /// Tick at which the note left `InFlight`; drives cosmetic removal.
    #[serde(skip)]
    pub settled_at: Option<f64>,
}

impl Note {
    pub fn is_in_flight(&self) -> bool {
        self.state == NoteState::InFlight
    }

    /// Compact state encoding for the packed render feed.
    pub fn state_code(&self) -> u8 {
        match self.state {
            NoteState::InFlight => 0,
            NoteState::Hit(HitQuality::Perfect) => 1,
            NoteState::Hit(HitQuality::Great) => 2,
            NoteState::Hit(HitQuality::Good) => 3,
            NoteState::Missed => 4,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Game,
    FreePlay,
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "game" => Ok(Mode::Game),
            "free" | "free_play" | "freeplay" => Ok(Mode::FreePlay),
            other => Err(GameError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the HUD flashes after a press or a miss.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Perfect,
    Great,
    Good,
    Miss,
}

impl From<HitQuality> for Feedback {
    fn from(quality: HitQuality) -> Self {
        match quality {
            HitQuality::Perfect => Feedback::Perfect,
            HitQuality::Great => Feedback::Great,
            HitQuality::Good => Feedback::Good,
        }
    }
}

/// Session counters shown on the HUD.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub lives: u32,
    pub level: u32,
    pub speed_factor: f64,
    pub streak: u32,
}

#[derive(Serialize, Clone, Debug)]
pub struct Snapshot {
    pub phase: Phase,
    pub mode: Mode,
    pub active_scale: String,
    pub hud: Hud,
    pub notes: Vec<Note>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("game".parse::<Mode>().unwrap(), Mode::Game);
        assert_eq!("free".parse::<Mode>().unwrap(), Mode::FreePlay);
        assert_eq!("free_play".parse::<Mode>().unwrap(), Mode::FreePlay);
        assert!(matches!(
            "arcade".parse::<Mode>(),
            Err(GameError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_state_codes() {
        let mut note = Note {
            id: 1,
            pitch: 60,
            vertical_position: 0.0,
            state: NoteState::InFlight,
            settled_at: None,
        };
        assert_eq!(note.state_code(), 0);
        note.state = NoteState::Hit(HitQuality::Good);
        assert_eq!(note.state_code(), 3);
        note.state = NoteState::Missed;
        assert_eq!(note.state_code(), 4);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&NoteState::Hit(HitQuality::Perfect)).unwrap();
        assert_eq!(json, r#"{"hit":"perfect"}"#);
        let json = serde_json::to_string(&Mode::FreePlay).unwrap();
        assert_eq!(json, r#""free_play""#);
    }
}
