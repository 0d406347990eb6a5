use serde::{Deserialize, Serialize};

use crate::catalog::pitch::Pitch;
use crate::catalog::scales;
use crate::error::{GameError, Result};
use crate::game::types::HitQuality;

/// Milliseconds per logic tick at the 60 steps/second reference rate.
pub const MS_PER_TICK: f64 = 1000.0 / 60.0;

pub fn ms_to_ticks(ms: f64) -> f64 {
    ms / MS_PER_TICK
}

/// Distance bands around the hit line, in position units.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Tolerances {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            perfect: 8.0,
            great: 16.0,
            good: 24.0,
        }
    }
}

impl Tolerances {
    /// Narrowest band containing `distance`, if any.
    pub fn classify(&self, distance: f64) -> Option<HitQuality> {
        if distance <= self.perfect {
            Some(HitQuality::Perfect)
        } else if distance <= self.great {
            Some(HitQuality::Great)
        } else if distance <= self.good {
            Some(HitQuality::Good)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HitScores {
    pub perfect: u64,
    pub great: u64,
    pub good: u64,
}

impl Default for HitScores {
    fn default() -> Self {
        HitScores {
            perfect: 100,
            great: 75,
            good: 50,
        }
    }
}

impl HitScores {
    pub fn for_quality(&self, quality: HitQuality) -> u64 {
        match quality {
            HitQuality::Perfect => self.perfect,
            HitQuality::Great => self.great,
            HitQuality::Good => self.good,
        }
    }
}

/// Adaptive fall-speed tuning.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpeedTuning {
    pub min_factor: f64,
    pub max_factor: f64,
    pub streak_for_boost: u32,
    pub streak_boost: f64,
    pub combo_milestone: u32,
    pub combo_boost: f64,
    pub miss_penalty: f64,
}

impl Default for SpeedTuning {
    fn default() -> Self {
        SpeedTuning {
            min_factor: 0.8,
            max_factor: 1.8,
            streak_for_boost: 4,
            streak_boost: 0.1,
            combo_milestone: 5,
            combo_boost: 0.05,
            miss_penalty: 0.15,
        }
    }
}

/// How long judged notes linger before the store drops them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RemovalGrace {
    pub hit_ms: f64,
    pub miss_ms: f64,
}

impl Default for RemovalGrace {
    fn default() -> Self {
        RemovalGrace {
            hit_ms: 400.0,
            miss_ms: 700.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub speed_multiplier: f64,
    /// Ticks between spawns at speed factor 1.0.
    pub spawn_interval: f64,
    pub notes: Vec<Pitch>,
    pub score_to_advance: u64,
}

fn level(
    speed_multiplier: f64,
    spawn_interval: f64,
    notes: &[Pitch],
    score_to_advance: u64,
) -> LevelConfig {
    LevelConfig {
        speed_multiplier,
        spawn_interval,
        notes: notes.to_vec(),
        score_to_advance,
    }
}

/// The five-stage progression, each level drawing on a wider pool.
pub fn default_levels() -> Vec<LevelConfig> {
    let penta = scales::scale_or_default("c_major_pentascale").pitches;
    let major = scales::scale_or_default("c_major_scale_c4_c5").pitches;
    let chromatic = scales::scale_or_default("chromatic_c4_c5").pitches;
    let all = scales::scale_or_default(scales::DEFAULT_SCALE_KEY).pitches;

    vec![
        level(0.8, 150.0, &penta[..3], 750),
        level(0.9, 130.0, penta, 2000),
        level(1.0, 110.0, major, 4000),
        level(1.1, 90.0, &chromatic[..7], 7000),
        level(1.2, 75.0, all, 10000),
    ]
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub hit_line_y: f64,
    pub note_height: f64,
    /// FreePlay notes past this line are retired without consequence.
    pub offscreen_y: f64,
    pub tolerances: Tolerances,
    pub hit_scores: HitScores,
    pub starting_lives: u32,
    pub base_speed: f64,
    pub free_play_speed_scale: f64,
    pub free_play_spawn_interval: f64,
    pub min_spawn_interval: f64,
    pub speed: SpeedTuning,
    pub grace: RemovalGrace,
    pub max_frame_ms: f64,
    pub tone_duration_secs: f64,
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            hit_line_y: 550.0,
            note_height: 50.0,
            offscreen_y: 650.0,
            tolerances: Tolerances::default(),
            hit_scores: HitScores::default(),
            starting_lives: 3,
            base_speed: 1.0,
            free_play_speed_scale: 0.7,
            free_play_spawn_interval: 120.0,
            min_spawn_interval: 30.0,
            speed: SpeedTuning::default(),
            grace: RemovalGrace::default(),
            max_frame_ms: 250.0,
            tone_duration_secs: 0.7,
            levels: default_levels(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        let t = &self.tolerances;
        if !(t.perfect > 0.0 && t.perfect <= t.great && t.great <= t.good) {
            return invalid("tolerances must satisfy 0 < perfect <= great <= good");
        }
        let s = &self.speed;
        if !(s.min_factor > 0.0 && s.min_factor <= s.max_factor) {
            return invalid("speed factor bounds must satisfy 0 < min <= max");
        }
        if self.levels.is_empty() {
            return invalid("at least one level is required");
        }
        if self.levels.iter().any(|l| l.spawn_interval <= 0.0 || l.speed_multiplier <= 0.0) {
            return invalid("level speed and spawn interval must be positive");
        }
        if self.min_spawn_interval <= 0.0 || self.free_play_spawn_interval <= 0.0 {
            return invalid("spawn intervals must be positive");
        }
        if self.note_height < 0.0 || self.max_frame_ms < 0.0 {
            return invalid("note height and frame clamp must not be negative");
        }
        Ok(())
    }

    /// Level `n`, 1-based.
    pub fn level(&self, n: u32) -> Option<&LevelConfig> {
        (n as usize).checked_sub(1).and_then(|i| self.levels.get(i))
    }
}
