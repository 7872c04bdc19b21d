//! Error types for the battle pass service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattlePassError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Player already exists: {0}")]
    PlayerAlreadyExists(String),

    #[error("Reward not found: {0}")]
    RewardNotFound(String),

    #[error("Player has already received this reward")]
    RewardAlreadyGranted,

    #[error("Reward has already been claimed")]
    RewardAlreadyClaimed,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BattlePassError {
    /// HTTP status classification for the boundary layer.
    pub fn status_code(&self) -> u16 {
        match self {
            BattlePassError::InvalidArgument(_) => 400,
            BattlePassError::PlayerNotFound(_) => 404,
            BattlePassError::PlayerAlreadyExists(_) => 409,
            BattlePassError::RewardNotFound(_) => 404,
            BattlePassError::RewardAlreadyGranted => 409,
            BattlePassError::RewardAlreadyClaimed => 409,
            BattlePassError::Storage(_) => 500,
        }
    }

    /// Deterministic business-rule failures are surfaced verbatim and must
    /// never be retried; storage failures may be.
    pub fn is_business_error(&self) -> bool {
        !matches!(self, BattlePassError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, BattlePassError>;
