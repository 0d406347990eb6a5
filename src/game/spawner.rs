use rand::Rng;

use crate::catalog::pitch::{Pitch, SAFE_DEFAULT_PITCH};
use crate::error::GameError;
use crate::game::store::NoteStore;
use crate::game::types::Note;

const FALLBACK_POOL: [Pitch; 1] = [SAFE_DEFAULT_PITCH];

/// Ticks between spawns: the base interval shortened by the speed factor,
/// never below `min_interval`.
pub fn effective_cadence(base_interval: f64, speed_factor: f64, min_interval: f64) -> f64 {
    let cadence = if speed_factor > 0.0 {
        base_interval / speed_factor
    } else {
        base_interval
    };
    cadence.max(min_interval)
}

/// Never hand the spawner an empty pool: fall back to the safe default pitch.
pub fn non_empty_pool(pool: &[Pitch]) -> &[Pitch] {
    if pool.is_empty() {
        log::warn!("{}, spawning C4 instead", GameError::EmptyNotePool);
        &FALLBACK_POOL
    } else {
        pool
    }
}

#[derive(Debug, Default)]
pub struct Spawner {
    accumulator: f64,
}

impl Spawner {
    pub fn new() -> Self {
        Spawner::default()
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    /// Add `elapsed` ticks; once `cadence` is reached, spawn one note with a
    /// uniformly chosen pitch and restart the count from zero.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        elapsed: f64,
        cadence: f64,
        pool: &[Pitch],
        store: &mut NoteStore,
        rng: &mut R,
    ) -> Option<Note> {
        self.accumulator += elapsed.max(0.0);
        if self.accumulator < cadence {
            return None;
        }
        self.accumulator = 0.0;

        let pool = non_empty_pool(pool);
        let pitch = pool[rng.gen_range(0..pool.len())];
        Some(store.spawn(pitch))
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
