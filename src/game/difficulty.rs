use crate::game::config::SpeedTuning;
use crate::game::types::HitQuality;

pub const BASELINE_FACTOR: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyEvent {
    GoodHit(HitQuality),
    /// A wrong/mistimed press or a note that fell past the hit line.
    Miss,
}

/// Adaptive fall-speed multiplier driven by hit streaks, combo milestones and misses.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedController {
    factor: f64,
    streak: u32,
}

impl Default for SpeedController {
    fn default() -> Self {
        SpeedController {
            factor: BASELINE_FACTOR,
            streak: 0,
        }
    }
}

impl SpeedController {
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Back to baseline, as on entering a new level.
    pub fn reset(&mut self) {
        *self = SpeedController::default();
    }

    /// Apply one event. `combo` is the post-update combo, `level_floor` the
    /// current level's base speed multiplier. Returns true if the factor moved.
    pub fn observe(
        &mut self,
        event: DifficultyEvent,
        combo: u32,
        level_floor: f64,
        tuning: &SpeedTuning,
    ) -> bool {
        let before = self.factor;

        match event {
            DifficultyEvent::GoodHit(quality) => {
                if quality.is_streak_quality() {
                    self.streak += 1;
                    if self.streak >= tuning.streak_for_boost {
                        self.factor += tuning.streak_boost;
                        self.streak = 0;
                        log::debug!("Speed increased by streak: {:.2}", self.bounded(tuning));
                    }
                } else {
                    self.streak = 0;
                }

                if tuning.combo_milestone > 0 && combo > 1 && combo % tuning.combo_milestone == 0 {
                    self.factor += tuning.combo_boost;
                    log::debug!("Speed increased by combo milestone: {:.2}", self.bounded(tuning));
                }
            }
            DifficultyEvent::Miss => {
                self.streak = 0;
                self.factor = (self.factor - tuning.miss_penalty).max(tuning.min_factor);
                // A miss never drops below what the level itself demands.
                self.factor = self.factor.max(level_floor);
                log::debug!("Speed decreased by miss: {:.2}", self.bounded(tuning));
            }
        }

        self.factor = self.bounded(tuning);
        (self.factor - before).abs() > f64::EPSILON
    }

    fn bounded(&self, tuning: &SpeedTuning) -> f64 {
        self.factor.clamp(tuning.min_factor, tuning.max_factor)
    }
}
