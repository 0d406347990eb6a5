use std::collections::VecDeque;

use serde::Serialize;

use crate::catalog::pitch::Pitch;
use crate::game::types::{Feedback, NoteId, Phase};

/// Side effects for the host: sound, key highlighting, HUD flashes.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ToneOn {
        pitch: Pitch,
        frequency: f64,
        duration_secs: f64,
    },
    ToneOff {
        pitch: Pitch,
    },
    AllTonesOff,
    KeyDown {
        pitch: Pitch,
    },
    KeyUp {
        pitch: Pitch,
    },
    /// Judgement colour for the pressed key.
    KeyFlash {
        pitch: Pitch,
        feedback: Feedback,
    },
    HitFeedback {
        feedback: Feedback,
        scored: bool,
    },
    NoteSpawned {
        id: NoteId,
        pitch: Pitch,
    },
    NoteRemoved {
        id: NoteId,
    },
    SpeedChanged {
        factor: f64,
    },
    LevelUp {
        level: u32,
    },
    PhaseChanged {
        phase: Phase,
    },
    GameOver {
        score: u64,
        level: u32,
        max_combo: u32,
    },
    Completed {
        score: u64,
        max_combo: u32,
    },
}

/// Most events kept between drains. A host that never drains loses the
/// oldest ones first.
pub const MAX_PENDING: usize = 1024;

/// FIFO of pending events, drained by the host once per frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
    dropped: u64,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        if self.pending.len() >= MAX_PENDING {
            self.pending.pop_front();
            if self.dropped == 0 {
                log::warn!("Event queue full, dropping oldest events until drained");
            }
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        if self.dropped > 0 {
            log::debug!("{} events were dropped before this drain", self.dropped);
            self.dropped = 0;
        }
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop queued cosmetic removals, e.g. after the store was cleared.
    pub fn discard_removals(&mut self) {
        self.pending
            .retain(|e| !matches!(e, GameEvent::NoteRemoved { .. }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::default();
        queue.push(GameEvent::KeyDown { pitch: 60 });
        queue.push(GameEvent::AllTonesOff);
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_undrained_queue_is_bounded() {
        let mut queue = EventQueue::default();
        for id in 0..(MAX_PENDING as u64 + 10) {
            queue.push(GameEvent::NoteSpawned { id, pitch: 60 });
        }
        assert_eq!(queue.len(), MAX_PENDING);
        let events = queue.drain();
        assert_eq!(events[0], GameEvent::NoteSpawned { id: 10, pitch: 60 });
        assert_eq!(
            events.last(),
            Some(&GameEvent::NoteSpawned {
                id: MAX_PENDING as u64 + 9,
                pitch: 60
            })
        );

        // Draining resets the queue to full capacity.
        queue.push(GameEvent::AllTonesOff);
        assert_eq!(queue.drain(), vec![GameEvent::AllTonesOff]);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::HitFeedback {
            feedback: Feedback::Great,
            scored: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"hit_feedback","feedback":"great","scored":true}"#);
    }
}
