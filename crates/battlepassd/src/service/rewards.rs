//! Reward claiming and ledger projections.

use std::sync::Arc;

use tracing::info;

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::player::validate_player_id;
use battlepass_common::reward::GrantedReward;

use crate::store::{catalog, ledger, Store};

/// Transitions granted rewards to claimed and serves ledger reads.
#[derive(Clone)]
pub struct RewardService {
    store: Arc<Store>,
}

impl RewardService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Marks a granted reward as claimed.
    ///
    /// The transition is one-way: claiming twice fails with
    /// `RewardAlreadyClaimed`, claiming a never-granted reward with
    /// `RewardNotFound`.
    pub async fn claim_reward(&self, player_id: &str, level: u32) -> Result<()> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();

        self.store
            .write_tx(move |tx| {
                let Some(def) = catalog::find_by_level(tx, level)? else {
                    return Err(BattlePassError::RewardNotFound(format!(
                        "no reward defined for level {level}"
                    )));
                };
                let Some(grant) = ledger::find_by_player_and_reward(tx, &player_id, def.id)?
                else {
                    return Err(BattlePassError::RewardNotFound(
                        "reward not granted to this player".into(),
                    ));
                };
                if grant.claimed {
                    return Err(BattlePassError::RewardAlreadyClaimed);
                }
                // The WHERE claimed = 0 guard makes the flip race-safe.
                if ledger::mark_claimed(tx, grant.id)? == 0 {
                    return Err(BattlePassError::RewardAlreadyClaimed);
                }
                info!("Player {player_id} claimed the level {level} reward");
                Ok(())
            })
            .await
    }

    /// Every reward granted to the player, claimed or not.
    pub async fn get_player_rewards(&self, player_id: &str) -> Result<Vec<GrantedReward>> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();
        self.store
            .read(move |conn| ledger::find_by_player(conn, &player_id))
            .await
    }

    /// Granted-but-unclaimed rewards only.
    pub async fn get_unclaimed_rewards(&self, player_id: &str) -> Result<Vec<GrantedReward>> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();
        self.store
            .read(move |conn| ledger::find_unclaimed_by_player(conn, &player_id))
            .await
    }
}
