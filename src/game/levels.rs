use crate::game::config::LevelConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelProgress {
    Stay,
    Advance(u32),
    /// Threshold of the final level reached.
    Completed,
}

/// Decide whether `score` moves the run past 1-based `current` level.
pub fn check_progress(levels: &[LevelConfig], current: u32, score: u64) -> LevelProgress {
    let Some(config) = (current as usize).checked_sub(1).and_then(|i| levels.get(i)) else {
        return LevelProgress::Stay;
    };
    if score < config.score_to_advance {
        return LevelProgress::Stay;
    }
    if (current as usize) < levels.len() {
        LevelProgress::Advance(current + 1)
    } else {
        LevelProgress::Completed
    }
}
