//! Player identity and its validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BattlePassError, Result};

pub const PLAYER_ID_MIN_LEN: usize = 3;
pub const PLAYER_ID_MAX_LEN: usize = 50;
pub const NICKNAME_MIN_LEN: usize = 2;
pub const NICKNAME_MAX_LEN: usize = 50;

/// A registered player account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

/// Player ids are 3-50 characters of letters, digits, underscores and hyphens.
pub fn validate_player_id(player_id: &str) -> Result<()> {
    if player_id.len() < PLAYER_ID_MIN_LEN || player_id.len() > PLAYER_ID_MAX_LEN {
        return Err(BattlePassError::InvalidArgument(format!(
            "player id must be between {PLAYER_ID_MIN_LEN} and {PLAYER_ID_MAX_LEN} characters"
        )));
    }
    if !player_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(BattlePassError::InvalidArgument(
            "player id can only contain letters, digits, underscores and hyphens".into(),
        ));
    }
    Ok(())
}

/// Nicknames are 2-50 characters of letters, digits, spaces, dots,
/// underscores and hyphens.
pub fn validate_nickname(nickname: &str) -> Result<()> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN || len > NICKNAME_MAX_LEN {
        return Err(BattlePassError::InvalidArgument(format!(
            "nickname must be between {NICKNAME_MIN_LEN} and {NICKNAME_MAX_LEN} characters"
        )));
    }
    if !nickname
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '.' || c == '_' || c == '-')
    {
        return Err(BattlePassError::InvalidArgument(
            "nickname can only contain letters, digits, spaces, dots, underscores and hyphens"
                .into(),
        ));
    }
    Ok(())
}
