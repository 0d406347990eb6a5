use thiserror::Error;

use crate::game::types::Phase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// A pitch outside the playable catalog (MIDI 48..=72).
    #[error("Unknown pitch: {0}")]
    UnknownPitch(u8),

    /// A note name that does not parse or falls outside the catalog.
    #[error("Unknown note name: {0}")]
    UnknownNoteName(String),

    #[error("Unknown scale: {0}")]
    UnknownScale(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// A level or scale resolved to no pitches at all.
    #[error("Note pool is empty")]
    EmptyNotePool,

    /// A session control that is not valid from the current phase.
    ///
    /// ```
    /// # use keyfall::error::GameError;
    /// # use keyfall::game::types::Phase;
    /// let err = GameError::InvalidStateTransition { from: Phase::Idle, action: "pause" };
    /// assert_eq!(err.to_string(), "Cannot pause while Idle");
    /// ```
    #[error("Cannot {action} while {from:?}")]
    InvalidStateTransition { from: Phase, action: &'static str },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(GameError::UnknownPitch(30).to_string(), "Unknown pitch: 30");
        assert_eq!(
            GameError::UnknownScale("dorian".to_string()).to_string(),
            "Unknown scale: dorian"
        );
        assert_eq!(GameError::EmptyNotePool.to_string(), "Note pool is empty");
    }
}
