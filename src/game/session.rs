use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::catalog::pitch::{self, Pitch};
use crate::catalog::scales;
use crate::error::{GameError, Result};
use crate::game::clock::FrameClock;
use crate::game::config::{ms_to_ticks, GameConfig};
use crate::game::difficulty::{DifficultyEvent, SpeedController};
use crate::game::events::{EventQueue, GameEvent};
use crate::game::judge::{self, Outcome};
use crate::game::levels::{self, LevelProgress};
use crate::game::spawner::{self, Spawner};
use crate::game::store::NoteStore;
use crate::game::types::{Feedback, Hud, Mode, Note, Phase, Snapshot};
use crate::input::InputEvent;

/// Score, combo, lives and level for the current run.
#[derive(Clone, Debug, PartialEq)]
struct Scoreboard {
    score: u64,
    combo: u32,
    max_combo: u32,
    lives: u32,
    level: u32,
}

impl Scoreboard {
    fn new(lives: u32) -> Self {
        Scoreboard {
            score: 0,
            combo: 1,
            max_combo: 0,
            lives,
            level: 1,
        }
    }
}

/// Pitches the spawner draws from for the given mode.
fn note_pool<'a>(config: &'a GameConfig, mode: Mode, level: u32, scale_key: &str) -> &'a [Pitch] {
    match mode {
        Mode::Game => config.level(level).map(|l| l.notes.as_slice()).unwrap_or(&[]),
        Mode::FreePlay => scales::scale_or_default(scale_key).pitches,
    }
}

/// One player's game: falling notes, judgement, scoring and difficulty.
///
/// Everything runs on the caller's thread; input and frame callbacks must be
/// serialized by the host event loop.
pub struct Session {
    config: GameConfig,
    phase: Phase,
    mode: Mode,
    active_scale: &'static str,
    board: Scoreboard,
    speed: SpeedController,
    store: NoteStore,
    spawner: Spawner,
    clock: FrameClock,
    rng: SmallRng,
    events: EventQueue,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Session::build(config, seed))
    }

    /// Session on the built-in configuration, which always validates.
    pub fn with_defaults(seed: u64) -> Self {
        Session::build(GameConfig::default(), seed)
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        Session {
            board: Scoreboard::new(config.starting_lives),
            store: NoteStore::new(-config.note_height),
            config,
            phase: Phase::Idle,
            mode: Mode::Game,
            active_scale: scales::DEFAULT_SCALE_KEY,
            speed: SpeedController::default(),
            spawner: Spawner::new(),
            clock: FrameClock::new(),
            rng: SmallRng::seed_from_u64(seed),
            events: EventQueue::default(),
        }
    }

    /// Replace the configuration. An invalid config is refused and the
    /// current one kept. Always resets the session on success.
    pub fn configure(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.store.set_spawn_position(-config.note_height);
        self.config = config;
        self.reset();
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_scale(&self) -> &'static str {
        self.active_scale
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.board.score,
            combo: self.board.combo,
            max_combo: self.board.max_combo,
            lives: self.board.lives,
            level: self.board.level,
            speed_factor: self.speed.factor(),
            streak: self.speed.streak(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            mode: self.mode,
            active_scale: self.active_scale.to_string(),
            hud: self.hud(),
            notes: self.store.notes().to_vec(),
        }
    }

    /// Events since the last drain, oldest first. Hosts should drain every
    /// frame; past `events::MAX_PENDING` the oldest events are discarded.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // --- Session state machine -------------------------------------------

    /// Begin a run from `Idle`, or resume when `Paused`.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle => {
                self.board = Scoreboard::new(self.config.starting_lives);
                self.speed.reset();
                self.spawner.reset();
                self.clock.rebase();
                self.set_phase(Phase::Running);
                log::info!("Run started in {:?} mode", self.mode);
                Ok(())
            }
            Phase::Paused => self.resume(),
            from => Err(GameError::InvalidStateTransition {
                from,
                action: "start",
            }),
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.phase != Phase::Running {
            return Err(GameError::InvalidStateTransition {
                from: self.phase,
                action: "pause",
            });
        }
        self.set_phase(Phase::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.phase != Phase::Paused {
            return Err(GameError::InvalidStateTransition {
                from: self.phase,
                action: "resume",
            });
        }
        self.clock.rebase();
        self.set_phase(Phase::Running);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.phase {
            Phase::Running => self.pause(),
            _ => self.resume(),
        }
    }

    /// Back to `Idle` from anywhere: counters reinitialized, playfield cleared.
    pub fn reset(&mut self) {
        self.board = Scoreboard::new(self.config.starting_lives);
        self.speed.reset();
        self.store.clear();
        self.spawner.reset();
        self.clock.reset();
        // Removals for notes that no longer exist are meaningless now.
        self.events.discard_removals();
        self.events.push(GameEvent::AllTonesOff);
        if self.phase != Phase::Idle {
            self.set_phase(Phase::Idle);
        }
    }

    /// Switching mode always forces a full reset.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.reset();
    }

    /// Select the FreePlay note pool. Unknown keys are refused and the
    /// current scale stays active.
    pub fn set_scale(&mut self, key: &str) -> Result<()> {
        let scale = scales::scale(key)?;
        self.active_scale = scale.key;
        match self.phase {
            Phase::Running | Phase::Paused => {
                log::info!("Scale changed mid-run; new notes come from {}", scale.key)
            }
            _ => self.reset(),
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged { phase });
    }

    // --- Input -----------------------------------------------------------

    pub fn handle_input(&mut self, event: InputEvent) -> Option<Outcome> {
        match event {
            InputEvent::NoteOn { pitch, .. } => self.handle_press(pitch),
            InputEvent::NoteOff { pitch } => {
                self.handle_release(pitch);
                None
            }
        }
    }

    /// A key went down. Sound and key highlight always respond; judgement
    /// only happens while running. Presses outside the catalog are dropped.
    pub fn handle_press(&mut self, pitch: Pitch) -> Option<Outcome> {
        if !pitch::in_catalog(pitch) {
            log::debug!("Dropping press: {}", GameError::UnknownPitch(pitch));
            return None;
        }

        self.events.push(GameEvent::ToneOn {
            pitch,
            frequency: pitch::frequency_of(pitch),
            duration_secs: self.config.tone_duration_secs,
        });
        self.events.push(GameEvent::KeyDown { pitch });

        if self.phase != Phase::Running {
            return None;
        }

        let now = self.clock.elapsed_ticks();
        let outcome = judge::judge_press(&mut self.store, pitch, self.mode, &self.config, now);
        self.apply_outcome(pitch, &outcome);
        Some(outcome)
    }

    pub fn handle_release(&mut self, pitch: Pitch) {
        if !pitch::in_catalog(pitch) {
            log::debug!("Dropping release: {}", GameError::UnknownPitch(pitch));
            return;
        }
        self.events.push(GameEvent::ToneOff { pitch });
        self.events.push(GameEvent::KeyUp { pitch });
    }

    fn apply_outcome(&mut self, pitch: Pitch, outcome: &Outcome) {
        match (outcome, self.mode) {
            (Outcome::Hit { quality, .. }, Mode::Game) => {
                let board = &mut self.board;
                board.score += self.config.hit_scores.for_quality(*quality) * board.combo as u64;
                board.combo += 1;
                board.max_combo = board.max_combo.max(board.combo);
                self.feed_difficulty(DifficultyEvent::GoodHit(*quality));
                self.flash(pitch, (*quality).into(), true);
                self.advance_level();
            }
            (Outcome::Hit { quality, .. }, Mode::FreePlay) => {
                self.flash(pitch, (*quality).into(), false);
            }
            (Outcome::WrongOrMistimed, _) => {
                self.board.combo = 1;
                self.feed_difficulty(DifficultyEvent::Miss);
                self.flash(pitch, Feedback::Miss, true);
                self.advance_level();
            }
            (Outcome::NoTarget, _) => {}
        }
    }

    fn flash(&mut self, pitch: Pitch, feedback: Feedback, scored: bool) {
        self.events.push(GameEvent::KeyFlash { pitch, feedback });
        self.events.push(GameEvent::HitFeedback { feedback, scored });
    }

    fn feed_difficulty(&mut self, event: DifficultyEvent) {
        let floor = self
            .config
            .level(self.board.level)
            .map_or(self.config.speed.min_factor, |l| l.speed_multiplier);
        if self
            .speed
            .observe(event, self.board.combo, floor, &self.config.speed)
        {
            self.events.push(GameEvent::SpeedChanged {
                factor: self.speed.factor(),
            });
        }
    }

    // --- Clock -----------------------------------------------------------

    /// Host animation-frame callback with a timestamp in milliseconds.
    pub fn frame(&mut self, now_ms: f64) {
        if self.phase != Phase::Running {
            return;
        }
        let delta = self.clock.frame(now_ms, self.config.max_frame_ms);
        self.update(delta);
    }

    /// Advance the simulation by `delta_ms` of wall time.
    pub fn update_ms(&mut self, delta_ms: f64) {
        self.update(ms_to_ticks(delta_ms.clamp(0.0, self.config.max_frame_ms)));
    }

    /// One simulation step of `delta` ticks (1.0 = one 60 Hz frame).
    pub fn update(&mut self, delta: f64) {
        if self.phase != Phase::Running {
            return;
        }
        let delta = delta.max(0.0);
        self.clock.accumulate(delta);
        let now = self.clock.elapsed_ticks();

        // Spawn
        let (base_speed, base_interval) = self.lane_tempo();
        let cadence = spawner::effective_cadence(
            base_interval,
            self.speed.factor(),
            self.config.min_spawn_interval,
        );
        let pool = note_pool(&self.config, self.mode, self.board.level, self.active_scale);
        if let Some(note) =
            self.spawner
                .maybe_spawn(delta, cadence, pool, &mut self.store, &mut self.rng)
        {
            self.events.push(GameEvent::NoteSpawned {
                id: note.id,
                pitch: note.pitch,
            });
        }

        // Fall
        self.store.advance_all(base_speed * self.speed.factor() * delta);

        // Miss sweep
        match self.mode {
            Mode::Game => self.sweep_missed(now),
            Mode::FreePlay => {
                let culled = self.store.sweep_missed(self.config.offscreen_y, 0.0, now);
                if !culled.is_empty() {
                    log::debug!("Culled {} free play notes", culled.len());
                }
            }
        }

        self.advance_level();
        self.purge(now);
    }

    /// Level base speed and spawn interval for the current mode.
    fn lane_tempo(&self) -> (f64, f64) {
        match (self.mode, self.config.level(self.board.level)) {
            (Mode::Game, Some(level)) => (
                level.speed_multiplier * self.config.base_speed,
                level.spawn_interval,
            ),
            (Mode::Game, None) => (self.config.base_speed, self.config.free_play_spawn_interval),
            (Mode::FreePlay, _) => (
                self.config.base_speed * self.config.free_play_speed_scale,
                self.config.free_play_spawn_interval,
            ),
        }
    }

    fn sweep_missed(&mut self, now: f64) {
        let missed = self.store.sweep_missed(
            self.config.hit_line_y,
            self.config.tolerances.good,
            now,
        );
        for note in missed {
            log::debug!("Note {} ({}) missed", note.id, note.pitch);
            self.board.lives = self.board.lives.saturating_sub(1);
            self.board.combo = 1;
            self.feed_difficulty(DifficultyEvent::Miss);
            self.events.push(GameEvent::HitFeedback {
                feedback: Feedback::Miss,
                scored: true,
            });
            if self.board.lives == 0 {
                self.game_over();
                break;
            }
        }
    }

    fn game_over(&mut self) {
        log::info!(
            "Game over at level {} with {} points, max combo x{}",
            self.board.level,
            self.board.score,
            self.board.max_combo
        );
        self.events.push(GameEvent::AllTonesOff);
        self.events.push(GameEvent::GameOver {
            score: self.board.score,
            level: self.board.level,
            max_combo: self.board.max_combo,
        });
        self.set_phase(Phase::GameOver);
    }

    /// Move to the next level once its score threshold is met, or complete
    /// the run after the last one.
    pub fn advance_level(&mut self) {
        if self.mode != Mode::Game || self.phase != Phase::Running {
            return;
        }
        match levels::check_progress(&self.config.levels, self.board.level, self.board.score) {
            LevelProgress::Stay => {}
            LevelProgress::Advance(level) => {
                self.board.level = level;
                self.speed.reset();
                log::info!("Level up! Now level {}", level);
                self.events.push(GameEvent::LevelUp { level });
                self.events.push(GameEvent::SpeedChanged {
                    factor: self.speed.factor(),
                });
            }
            LevelProgress::Completed => {
                log::info!(
                    "All levels beaten with {} points, max combo x{}",
                    self.board.score,
                    self.board.max_combo
                );
                self.events.push(GameEvent::Completed {
                    score: self.board.score,
                    max_combo: self.board.max_combo,
                });
                self.set_phase(Phase::Completed);
            }
        }
    }

    fn purge(&mut self, now: f64) {
        let grace = &self.config.grace;
        let purged = self.store.purge_terminal(
            now,
            ms_to_ticks(grace.hit_ms),
            ms_to_ticks(grace.miss_ms),
        );
        for id in purged {
            self.events.push(GameEvent::NoteRemoved { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::MAX_PENDING;
    use crate::game::types::{HitQuality, NoteState};

    fn session() -> Session {
        Session::new(GameConfig::default(), 7).unwrap()
    }

    fn running(mode: Mode) -> Session {
        let mut s = session();
        s.set_mode(mode);
        s.start().unwrap();
        s
    }

    /// Put a note of `pitch` directly into the store with its bottom edge on the hit line.
    fn place_on_hit_line(s: &mut Session, pitch: Pitch) {
        s.store.spawn(pitch);
        let id = s.store.notes().last().unwrap().id;
        let travel = s.config.hit_line_y;
        for note in s.store.notes().to_vec() {
            assert!(note.id == id || !note.is_in_flight(), "test expects one in-flight note");
        }
        s.store.advance_all(travel);
    }

    #[test]
    fn test_state_machine() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(matches!(
            s.pause(),
            Err(GameError::InvalidStateTransition { action: "pause", .. })
        ));
        assert!(s.resume().is_err());

        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Running);
        assert!(s.start().is_err());

        s.pause().unwrap();
        assert_eq!(s.phase(), Phase::Paused);
        // start() while paused resumes rather than restarting.
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Running);

        s.toggle_pause().unwrap();
        assert_eq!(s.phase(), Phase::Paused);
        s.toggle_pause().unwrap();
        assert_eq!(s.phase(), Phase::Running);

        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn test_update_is_noop_unless_running() {
        let mut s = session();
        s.update(500.0);
        assert!(s.notes().is_empty());

        s.start().unwrap();
        s.update(150.0);
        assert_eq!(s.notes().len(), 1);
        let before = s.notes()[0].vertical_position;

        s.pause().unwrap();
        s.update(100.0);
        s.frame(10_000.0);
        assert_eq!(s.notes()[0].vertical_position, before);
    }

    #[test]
    fn test_level_one_spawns_from_its_pool() {
        let mut s = running(Mode::Game);
        for _ in 0..40 {
            s.update(150.0);
            s.store.clear();
        }
        let spawned: Vec<Pitch> = s
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::NoteSpawned { pitch, .. } => Some(pitch),
                _ => None,
            })
            .collect();
        assert_eq!(spawned.len(), 40);
        assert!(spawned.iter().all(|p| [60, 62, 64].contains(p)));
    }

    #[test]
    fn test_perfect_hit_scores_with_combo() {
        let mut s = running(Mode::Game);
        place_on_hit_line(&mut s, 60);
        let outcome = s.handle_press(60).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Hit {
                quality: HitQuality::Perfect,
                ..
            }
        ));
        let hud = s.hud();
        assert_eq!(hud.score, 100);
        assert_eq!(hud.combo, 2);
        assert_eq!(hud.max_combo, 2);

        place_on_hit_line(&mut s, 62);
        s.handle_press(62);
        assert_eq!(s.hud().score, 100 + 200);
        assert_eq!(s.hud().combo, 3);
    }

    #[test]
    fn test_wrong_press_resets_combo() {
        let mut s = running(Mode::Game);
        place_on_hit_line(&mut s, 60);
        s.handle_press(60);
        assert_eq!(s.hud().combo, 2);

        assert_eq!(s.handle_press(64), Some(Outcome::WrongOrMistimed));
        let hud = s.hud();
        assert_eq!(hud.combo, 1);
        assert_eq!(hud.max_combo, 2);
        assert_eq!(hud.score, 100);
        assert_eq!(hud.lives, 3);
        assert!((hud.speed_factor - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_press_outside_catalog_is_dropped() {
        let mut s = running(Mode::Game);
        s.drain_events();
        assert_eq!(s.handle_press(100), None);
        assert_eq!(s.handle_press(20), None);
        assert!(s.drain_events().is_empty());
        assert_eq!(s.hud().combo, 1);
    }

    #[test]
    fn test_press_while_idle_only_plays() {
        let mut s = session();
        s.drain_events();
        assert_eq!(s.handle_press(60), None);
        let events = s.drain_events();
        assert!(matches!(events[0], GameEvent::ToneOn { pitch: 60, .. }));
        assert_eq!(events[1], GameEvent::KeyDown { pitch: 60 });
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut s = session();
        for _ in 0..MAX_PENDING {
            s.handle_press(60);
            s.handle_release(60);
        }
        let events = s.drain_events();
        assert_eq!(events.len(), MAX_PENDING);
        assert_eq!(events.last(), Some(&GameEvent::KeyUp { pitch: 60 }));
    }

    #[test]
    fn test_missed_note_costs_a_life() {
        let mut s = running(Mode::Game);
        s.store.spawn(60);
        s.store.advance_all(650.0);
        s.drain_events();
        s.update(0.0);
        let hud = s.hud();
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.combo, 1);
        assert!((hud.speed_factor - 0.85).abs() < 1e-9);
        assert_eq!(s.notes()[0].state, NoteState::Missed);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::SpeedChanged { .. })));
        // Sweeping again never double counts.
        s.update(0.0);
        assert_eq!(s.hud().lives, 2);
    }

    #[test]
    fn test_game_over_after_last_life() {
        let mut s = running(Mode::Game);
        for _ in 0..4 {
            s.store.spawn(60);
        }
        s.store.advance_all(650.0);
        s.update(0.0);
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.hud().lives, 0);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
        // The loop is stopped: nothing moves any more.
        let positions: Vec<f64> = s.notes().iter().map(|n| n.vertical_position).collect();
        s.update(100.0);
        let after: Vec<f64> = s.notes().iter().map(|n| n.vertical_position).collect();
        assert_eq!(positions, after);
        assert!(s.start().is_err());
    }

    #[test]
    fn test_free_play_has_no_consequences() {
        let mut s = running(Mode::FreePlay);
        s.store.spawn(60);
        // Past the game-mode miss line but still on screen.
        s.store.advance_all(650.0);
        s.update(0.0);
        assert_eq!(s.hud().lives, 3);
        assert_eq!(s.handle_press(62), Some(Outcome::NoTarget));
        assert_eq!(s.hud().combo, 1);
        assert_eq!(s.hud().score, 0);
        assert_eq!(s.hud().speed_factor, 1.0);
    }

    #[test]
    fn test_free_play_culls_offscreen_notes() {
        let mut s = running(Mode::FreePlay);
        s.store.spawn(60);
        s.store.advance_all(800.0);
        s.update(0.0);
        assert_eq!(s.notes()[0].state, NoteState::Missed);
        assert_eq!(s.hud().lives, 3);
        // Removed after the miss grace period.
        s.update(50.0);
        assert!(s.notes().is_empty());
    }

    #[test]
    fn test_free_play_uses_active_scale() {
        let mut s = session();
        s.set_mode(Mode::FreePlay);
        s.set_scale("g_major_pentascale").unwrap();
        s.start().unwrap();
        for _ in 0..30 {
            s.update(120.0);
        }
        let pool = scales::scale("g_major_pentascale").unwrap().pitches;
        assert!(!s.notes().is_empty());
        assert!(s.notes().iter().all(|n| pool.contains(&n.pitch)));
    }

    #[test]
    fn test_unknown_scale_keeps_current() {
        let mut s = session();
        s.set_scale("c_major_pentascale").unwrap();
        assert!(matches!(
            s.set_scale("bebop"),
            Err(GameError::UnknownScale(_))
        ));
        assert_eq!(s.active_scale(), "c_major_pentascale");
    }

    #[test]
    fn test_level_up_resets_speed() {
        let mut s = running(Mode::Game);
        s.speed.observe(
            DifficultyEvent::GoodHit(HitQuality::Perfect),
            5,
            0.8,
            &s.config.speed.clone(),
        );
        assert!(s.hud().speed_factor > 1.0);
        s.board.score = 740;
        place_on_hit_line(&mut s, 60);
        s.handle_press(60);
        let hud = s.hud();
        assert_eq!(hud.level, 2);
        assert_eq!(hud.speed_factor, 1.0);
        assert_eq!(hud.streak, 0);
    }

    #[test]
    fn test_completing_final_level() {
        let mut s = running(Mode::Game);
        s.board.level = 5;
        s.board.score = 10_000;
        s.update(1.0);
        assert_eq!(s.phase(), Phase::Completed);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Completed { score: 10_000, .. })));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = running(Mode::Game);
        place_on_hit_line(&mut s, 60);
        s.handle_press(60);
        s.update(200.0);
        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.notes().is_empty());
        let hud = s.hud();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.combo, 1);
        assert_eq!(hud.max_combo, 0);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.level, 1);
        let events = s.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NoteRemoved { .. })));
        assert!(events.contains(&GameEvent::AllTonesOff));
    }

    #[test]
    fn test_mode_switch_forces_reset() {
        let mut s = running(Mode::Game);
        place_on_hit_line(&mut s, 60);
        s.handle_press(60);
        s.set_mode(Mode::FreePlay);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.hud().score, 0);
        assert_eq!(s.mode(), Mode::FreePlay);
    }

    #[test]
    fn test_configure_rejects_invalid() {
        let mut s = session();
        let mut bad = GameConfig::default();
        bad.levels.clear();
        assert!(s.configure(bad).is_err());
        assert_eq!(s.config().levels.len(), 5);

        let mut good = GameConfig::default();
        good.starting_lives = 5;
        s.configure(good).unwrap();
        assert_eq!(s.hud().lives, 5);
    }

    #[test]
    fn test_hit_notes_removed_after_grace() {
        let mut s = running(Mode::Game);
        place_on_hit_line(&mut s, 60);
        s.handle_press(60);
        s.update(20.0);
        assert_eq!(s.notes().len(), 1);
        s.update(5.0);
        assert!(s.notes().iter().all(|n| n.is_in_flight()));
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::NoteRemoved { id: 1 })));
    }
}
