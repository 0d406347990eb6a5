use serde::Serialize;

use crate::catalog::pitch::Pitch;
use crate::game::config::GameConfig;
use crate::game::store::NoteStore;
use crate::game::types::{HitQuality, Mode, Note, NoteId};

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Hit { note: Note, quality: HitQuality },
    /// Game mode: nothing of this pitch inside the good band.
    WrongOrMistimed,
    /// Free play: nothing to hit, no consequence.
    NoTarget,
}

/// Distance between a note's bottom edge and the hit line.
pub fn hit_distance(note: &Note, note_height: f64, hit_line_y: f64) -> f64 {
    ((note.vertical_position + note_height) - hit_line_y).abs()
}

/// First in-flight note of `pitch`, in store order, that lies inside any
/// tolerance band. Store order wins over distance when several qualify.
pub fn find_target(
    store: &NoteStore,
    pitch: Pitch,
    config: &GameConfig,
) -> Option<(NoteId, HitQuality)> {
    store
        .in_flight()
        .filter(|note| note.pitch == pitch)
        .find_map(|note| {
            let distance = hit_distance(note, config.note_height, config.hit_line_y);
            config.tolerances.classify(distance).map(|q| (note.id, q))
        })
}

/// Judge a key press against the store, settling the matched note.
/// Scoring is left to the caller.
pub fn judge_press(
    store: &mut NoteStore,
    pitch: Pitch,
    mode: Mode,
    config: &GameConfig,
    now: f64,
) -> Outcome {
    let settled = find_target(store, pitch, config)
        .and_then(|(id, quality)| store.mark_hit(id, quality, now).map(|note| (note, quality)));

    match (settled, mode) {
        (Some((note, quality)), _) => Outcome::Hit { note, quality },
        (None, Mode::Game) => Outcome::WrongOrMistimed,
        (None, Mode::FreePlay) => Outcome::NoTarget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::NoteState;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    /// Store with one note of `pitch` whose bottom edge sits `offset` below the hit line.
    fn store_with_note_at(pitch: Pitch, offset: f64) -> NoteStore {
        let config = config();
        let mut store = NoteStore::new(-config.note_height);
        store.spawn(pitch);
        let target = config.hit_line_y - config.note_height + offset;
        store.advance_all(target + config.note_height);
        store
    }

    #[test]
    fn test_quality_bands() {
        let cases = [
            (0.0, Some(HitQuality::Perfect)),
            (-8.0, Some(HitQuality::Perfect)),
            (12.0, Some(HitQuality::Great)),
            (-20.0, Some(HitQuality::Good)),
            (24.0, Some(HitQuality::Good)),
            (30.0, None),
            (-200.0, None),
        ];
        for (offset, expected) in cases {
            let store = store_with_note_at(60, offset);
            let found = find_target(&store, 60, &config()).map(|(_, q)| q);
            assert_eq!(found, expected, "offset {}", offset);
        }
    }

    #[test]
    fn test_hit_settles_note() {
        let mut store = store_with_note_at(60, 2.0);
        let outcome = judge_press(&mut store, 60, Mode::Game, &config(), 5.0);
        match outcome {
            Outcome::Hit { note, quality } => {
                assert_eq!(quality, HitQuality::Perfect);
                assert_eq!(note.state, NoteState::Hit(HitQuality::Perfect));
            }
            other => panic!("expected hit, got {:?}", other),
        }
        // The same note cannot be hit twice.
        assert_eq!(
            judge_press(&mut store, 60, Mode::Game, &config(), 6.0),
            Outcome::WrongOrMistimed
        );
        assert_eq!(store.get(1).unwrap().settled_at, Some(5.0));
    }

    #[test]
    fn test_wrong_pitch() {
        let mut store = store_with_note_at(60, 0.0);
        assert_eq!(
            judge_press(&mut store, 62, Mode::Game, &config(), 0.0),
            Outcome::WrongOrMistimed
        );
        assert!(store.get(1).unwrap().is_in_flight());
    }

    #[test]
    fn test_empty_store_by_mode() {
        let mut store = NoteStore::new(-50.0);
        assert_eq!(
            judge_press(&mut store, 60, Mode::Game, &config(), 0.0),
            Outcome::WrongOrMistimed
        );
        assert_eq!(
            judge_press(&mut store, 60, Mode::FreePlay, &config(), 0.0),
            Outcome::NoTarget
        );
    }

    #[test]
    fn test_free_play_hit() {
        let mut store = store_with_note_at(64, -15.0);
        let outcome = judge_press(&mut store, 64, Mode::FreePlay, &config(), 0.0);
        assert!(matches!(
            outcome,
            Outcome::Hit {
                quality: HitQuality::Great,
                ..
            }
        ));
    }

    #[test]
    fn test_first_stored_match_wins() {
        let config = config();
        let mut store = NoteStore::new(-config.note_height);
        // Note 1 ends up 20 past the line (good), note 2 exactly on it (perfect).
        store.spawn(60);
        store.advance_all(20.0);
        store.spawn(60);
        store.advance_all(config.hit_line_y);

        let (id, quality) = find_target(&store, 60, &config).unwrap();
        assert_eq!(id, 1);
        assert_eq!(quality, HitQuality::Good);

        judge_press(&mut store, 60, Mode::Game, &config, 0.0);
        let (id, quality) = find_target(&store, 60, &config).unwrap();
        assert_eq!(id, 2);
        assert_eq!(quality, HitQuality::Perfect);
    }
}
