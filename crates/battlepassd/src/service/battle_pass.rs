//! Experience application and reward granting.

use std::sync::Arc;

use rusqlite::Connection;
use tracing::{debug, info};

use battlepass_common::api::{BattlePassSummary, BattlePassView};
use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::player::validate_player_id;
use battlepass_common::progression::apply_experience;
use battlepass_common::reward::GrantedReward;

use crate::store::{catalog, ledger, players, progress, Store};

/// Grants rewards for crossed levels atomically with the progress update.
#[derive(Clone)]
pub struct BattlePassService {
    store: Arc<Store>,
    max_level: u32,
}

impl BattlePassService {
    pub fn new(store: Arc<Store>, max_level: u32) -> Self {
        Self { store, max_level }
    }

    /// Applies an experience delta and grants any rewards for newly crossed
    /// levels, all in one transaction.
    ///
    /// Crossed levels with no catalog definition are skipped silently; levels
    /// beyond the configured cap are discarded. Delta bounds are a hard
    /// failure, never clamped.
    pub async fn add_experience(&self, player_id: &str, delta: i64) -> Result<BattlePassSummary> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();
        let max_level = self.max_level;

        let summary = self
            .store
            .write_tx(move |tx| {
                require_player(tx, &player_id)?;
                let current = progress::ensure(tx, &player_id)?;
                let mut outcome = apply_experience(current.level, current.experience, delta)?;

                if outcome.level > max_level {
                    outcome.level = max_level;
                    outcome.levels_crossed.retain(|&l| l <= max_level);
                }

                progress::update(tx, &player_id, outcome.level, outcome.experience)?;

                let mut granted = Vec::new();
                for level in &outcome.levels_crossed {
                    let Some(def) = catalog::find_by_level(tx, *level)? else {
                        continue;
                    };
                    if ledger::find_by_player_and_reward(tx, &player_id, def.id)?.is_some() {
                        continue;
                    }
                    let grant = ledger::insert_grant(tx, &player_id, def.id)?;
                    granted.push(GrantedReward {
                        grant,
                        level: def.level,
                        reward: def.reward,
                    });
                }

                Ok(BattlePassSummary {
                    player_id: player_id.clone(),
                    level: outcome.level,
                    experience: outcome.experience,
                    level_up: outcome.level_up(),
                    granted_rewards: granted,
                })
            })
            .await?;

        if summary.level_up {
            info!(
                "Player {} reached level {} ({} reward(s) granted)",
                summary.player_id,
                summary.level,
                summary.granted_rewards.len()
            );
        } else {
            debug!(
                "Player {} now at level {} with {} xp",
                summary.player_id, summary.level, summary.experience
            );
        }
        Ok(summary)
    }

    /// One-off grant of a specific level's reward, used at registration time
    /// and by the admin surface.
    pub async fn grant_reward(&self, player_id: &str, level: u32) -> Result<GrantedReward> {
        validate_player_id(player_id)?;
        if level < 1 {
            return Err(BattlePassError::InvalidArgument(
                "level must be at least 1".into(),
            ));
        }
        let player_id = player_id.to_string();

        self.store
            .write_tx(move |tx| {
                require_player(tx, &player_id)?;
                grant_level_reward(tx, &player_id, level)?.ok_or_else(|| {
                    BattlePassError::RewardNotFound(format!("no reward defined for level {level}"))
                })
            })
            .await
    }

    /// Current progress plus the player's reward ledger. The progress row is
    /// created lazily on first read.
    pub async fn get_battle_pass(&self, player_id: &str) -> Result<BattlePassView> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();

        self.store
            .write_tx(move |tx| {
                require_player(tx, &player_id)?;
                let current = progress::ensure(tx, &player_id)?;
                let rewards = ledger::find_by_player(tx, &player_id)?;
                Ok(BattlePassView {
                    player_id: player_id.clone(),
                    level: current.level,
                    experience: current.experience,
                    rewards,
                })
            })
            .await
    }
}

/// Grants `level`'s reward if the catalog defines one.
///
/// `Ok(None)` when the level has no definition; `RewardAlreadyGranted` when
/// the ledger already holds the pair.
pub(crate) fn grant_level_reward(
    conn: &Connection,
    player_id: &str,
    level: u32,
) -> Result<Option<GrantedReward>> {
    let Some(def) = catalog::find_by_level(conn, level)? else {
        return Ok(None);
    };
    if ledger::find_by_player_and_reward(conn, player_id, def.id)?.is_some() {
        return Err(BattlePassError::RewardAlreadyGranted);
    }
    let grant = ledger::insert_grant(conn, player_id, def.id)?;
    Ok(Some(GrantedReward {
        grant,
        level: def.level,
        reward: def.reward,
    }))
}

pub(crate) fn require_player(conn: &Connection, player_id: &str) -> Result<()> {
    if players::find_by_id(conn, player_id)?.is_none() {
        return Err(BattlePassError::PlayerNotFound(player_id.to_string()));
    }
    Ok(())
}
