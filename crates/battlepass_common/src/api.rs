//! Request and response schemas for the REST surface.

use serde::{Deserialize, Serialize};

use crate::reward::GrantedReward;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPlayerRequest {
    pub player_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlayerRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddExperienceRequest {
    pub experience: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRewardRequest {
    pub player_id: String,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRewardRequest {
    pub player_id: String,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRewardRequest {
    pub level: u32,
    pub reward: crate::reward::Reward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRewardRequest {
    pub reward: crate::reward::Reward,
}

/// Outcome of an experience grant: the new progress plus anything awarded by
/// this call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattlePassSummary {
    pub player_id: String,
    pub level: u32,
    pub experience: u32,
    pub level_up: bool,
    pub granted_rewards: Vec<GrantedReward>,
}

/// Current progress plus the player's full reward ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattlePassView {
    pub player_id: String,
    pub level: u32,
    pub experience: u32,
    pub rewards: Vec<GrantedReward>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicknameAvailability {
    pub nickname: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Structured error payload returned by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Liveness probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
