//! Reward payloads plus the catalog and ledger row types.
//!
//! The payload is a tagged union serialized as `{"type": ..., "body": {...}}`,
//! which is also the shape stored in the catalog's JSON column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BattlePassError, Result};

/// A levelled reward payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum Reward {
    Gold { amount: u32 },
    Powerup { powerup: String, quantity: u32 },
    ProfilePicture { id: u32 },
    ProfileBackground { id: u32 },
    ProfileAvatar { id: u32 },
}

impl Reward {
    /// Checks the per-variant payload rules.
    pub fn validate(&self) -> Result<()> {
        match self {
            Reward::Gold { amount } => {
                if *amount == 0 {
                    return Err(BattlePassError::InvalidArgument(
                        "gold amount must be positive".into(),
                    ));
                }
            }
            Reward::Powerup { powerup, quantity } => {
                if powerup.trim().is_empty() {
                    return Err(BattlePassError::InvalidArgument(
                        "powerup name must not be empty".into(),
                    ));
                }
                if *quantity == 0 {
                    return Err(BattlePassError::InvalidArgument(
                        "powerup quantity must be positive".into(),
                    ));
                }
            }
            Reward::ProfilePicture { id }
            | Reward::ProfileBackground { id }
            | Reward::ProfileAvatar { id } => {
                if *id == 0 {
                    return Err(BattlePassError::InvalidArgument(
                        "profile item id must be positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Catalog row: at most one reward per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub id: i64,
    pub level: u32,
    pub reward: Reward,
}

/// Ledger row recording that a player earned a level's reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    pub id: i64,
    pub player_id: String,
    pub reward_id: i64,
    pub claimed: bool,
    pub granted_at: DateTime<Utc>,
}

/// Ledger row joined with its catalog definition, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedReward {
    #[serde(flatten)]
    pub grant: RewardGrant,
    pub level: u32,
    pub reward: Reward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_body() {
        let json = serde_json::to_value(Reward::Gold { amount: 100 }).unwrap();
        assert_eq!(json["type"], "gold");
        assert_eq!(json["body"]["amount"], 100);

        let json = serde_json::to_value(Reward::Powerup {
            powerup: "joker".into(),
            quantity: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "powerup");
        assert_eq!(json["body"]["powerup"], "joker");
        assert_eq!(json["body"]["quantity"], 2);

        let json = serde_json::to_value(Reward::ProfilePicture { id: 7 }).unwrap();
        assert_eq!(json["type"], "profilePicture");
    }

    #[test]
    fn round_trips_from_stored_json() {
        let reward: Reward =
            serde_json::from_str(r#"{"type":"profileBackground","body":{"id":3}}"#).unwrap();
        assert_eq!(reward, Reward::ProfileBackground { id: 3 });
    }

    #[test]
    fn unknown_type_is_rejected() {
        let parsed: std::result::Result<Reward, _> =
            serde_json::from_str(r#"{"type":"gems","body":{"amount":5}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_enforces_positive_payloads() {
        assert!(Reward::Gold { amount: 0 }.validate().is_err());
        assert!(Reward::Gold { amount: 1 }.validate().is_ok());
        assert!(Reward::Powerup {
            powerup: "  ".into(),
            quantity: 1
        }
        .validate()
        .is_err());
        assert!(Reward::Powerup {
            powerup: "joker".into(),
            quantity: 0
        }
        .validate()
        .is_err());
        assert!(Reward::ProfileAvatar { id: 0 }.validate().is_err());
        assert!(Reward::ProfileAvatar { id: 4 }.validate().is_ok());
    }
}
