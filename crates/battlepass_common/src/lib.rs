//! Battle Pass Common - shared types and schemas for the battle pass service.
//!
//! Progression arithmetic, reward payloads, player validation and the error
//! taxonomy live here. Nothing in this crate touches storage or HTTP, so the
//! whole domain layer is unit-testable in isolation.

pub mod api;
pub mod error;
pub mod player;
pub mod progression;
pub mod reward;

pub use api::*;
pub use error::BattlePassError;
pub use player::Player;
pub use progression::{apply_experience, PlayerProgress, ProgressOutcome};
pub use reward::{GrantedReward, Reward, RewardDefinition, RewardGrant};
