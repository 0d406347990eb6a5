use crate::catalog::pitch::Pitch;
use crate::game::types::{HitQuality, Note, NoteId, NoteState};

/// The notes currently on the playfield, in spawn order.
#[derive(Debug)]
pub struct NoteStore {
    notes: Vec<Note>,
    next_id: NoteId,
    spawn_position: f64,
}

impl NoteStore {
    /// `spawn_position` is the offset new notes start at, above the hit zone.
    pub fn new(spawn_position: f64) -> Self {
        NoteStore {
            notes: Vec::new(),
            next_id: 1,
            spawn_position,
        }
    }

    pub fn set_spawn_position(&mut self, spawn_position: f64) {
        self.spawn_position = spawn_position;
    }

    pub fn spawn(&mut self, pitch: Pitch) -> Note {
        let note = Note {
            id: self.next_id,
            pitch,
            vertical_position: self.spawn_position,
            state: NoteState::InFlight,
            settled_at: None,
        };
        self.next_id += 1;
        self.notes.push(note);
        note
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| n.is_in_flight())
    }

    pub fn advance_all(&mut self, distance: f64) {
        // Negative distances would move notes backwards.
        let distance = distance.max(0.0);
        for note in self.notes.iter_mut().filter(|n| n.is_in_flight()) {
            note.vertical_position += distance;
        }
    }

    /// Transition an in-flight note to `Hit`. Returns the updated note, or
    /// `None` if it was already terminal or is gone.
    pub fn mark_hit(&mut self, id: NoteId, quality: HitQuality, now: f64) -> Option<Note> {
        self.settle(id, NoteState::Hit(quality), now)
    }

    pub fn mark_missed(&mut self, id: NoteId, now: f64) -> Option<Note> {
        self.settle(id, NoteState::Missed, now)
    }

    fn settle(&mut self, id: NoteId, state: NoteState, now: f64) -> Option<Note> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.is_in_flight())?;
        note.state = state;
        note.settled_at = Some(now);
        Some(*note)
    }

    /// Mark every in-flight note past `threshold + tolerance` as missed and
    /// return them in store order.
    pub fn sweep_missed(&mut self, threshold: f64, tolerance: f64, now: f64) -> Vec<Note> {
        let limit = threshold + tolerance;
        let mut missed = Vec::new();
        for note in self.notes.iter_mut() {
            if note.is_in_flight() && note.vertical_position > limit {
                note.state = NoteState::Missed;
                note.settled_at = Some(now);
                missed.push(*note);
            }
        }
        missed
    }

    /// Drop terminal notes settled more than their grace period ago.
    /// Returns their ids.
    pub fn purge_terminal(&mut self, now: f64, hit_grace: f64, miss_grace: f64) -> Vec<NoteId> {
        let mut purged = Vec::new();
        self.notes.retain(|note| {
            let grace = match note.state {
                NoteState::InFlight => return true,
                NoteState::Hit(_) => hit_grace,
                NoteState::Missed => miss_grace,
            };
            let expired = note.settled_at.map_or(true, |at| now - at > grace);
            if expired {
                purged.push(note.id);
            }
            !expired
        });
        purged
    }

    /// Empty the store. Ids keep counting up so they stay unique per session.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}
