//! Battle pass progression arithmetic.
//!
//! Pure level/experience math with no catalog, ledger or storage knowledge.
//! The reward side effects of a level-up live in the daemon services.

use serde::{Deserialize, Serialize};

use crate::error::{BattlePassError, Result};

/// Experience required to complete one level.
pub const LEVEL_UP_THRESHOLD: u32 = 100;

/// Largest experience delta a single call may apply.
pub const MAX_EXPERIENCE_DELTA: i64 = 10_000;

/// Per-player progression state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub player_id: String,
    pub level: u32,
    pub experience: u32,
}

impl PlayerProgress {
    /// Fresh progress for a newly registered player.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            level: 1,
            experience: 0,
        }
    }
}

/// Result of applying an experience delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOutcome {
    pub level: u32,
    pub experience: u32,
    /// Every level attained by this delta, in ascending order.
    pub levels_crossed: Vec<u32>,
}

impl ProgressOutcome {
    pub fn level_up(&self) -> bool {
        !self.levels_crossed.is_empty()
    }
}

/// Applies `delta` experience points to a `(level, experience)` pair.
///
/// The player levels up every time the running total reaches
/// [`LEVEL_UP_THRESHOLD`]; leftover experience stays strictly below the
/// threshold, it never carries a completed level. Returns the new state plus
/// the contiguous list of levels crossed. No level ceiling is applied here;
/// that policy belongs to the caller.
pub fn apply_experience(level: u32, experience: u32, delta: i64) -> Result<ProgressOutcome> {
    if level < 1 {
        return Err(BattlePassError::InvalidArgument(
            "level must be at least 1".into(),
        ));
    }
    if experience >= LEVEL_UP_THRESHOLD {
        return Err(BattlePassError::InvalidArgument(format!(
            "experience must be below {LEVEL_UP_THRESHOLD}"
        )));
    }
    if delta < 0 {
        return Err(BattlePassError::InvalidArgument(
            "experience delta must not be negative".into(),
        ));
    }
    if delta > MAX_EXPERIENCE_DELTA {
        return Err(BattlePassError::InvalidArgument(format!(
            "experience delta cannot exceed {MAX_EXPERIENCE_DELTA}"
        )));
    }

    let mut new_level = level;
    let mut total = experience + delta as u32;
    let mut levels_crossed = Vec::new();
    while total >= LEVEL_UP_THRESHOLD {
        new_level += 1;
        total -= LEVEL_UP_THRESHOLD;
        levels_crossed.push(new_level);
    }

    Ok(ProgressOutcome {
        level: new_level,
        experience: total,
        levels_crossed,
    })
}
