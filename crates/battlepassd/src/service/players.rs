//! Player registration and account management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::player::{validate_nickname, validate_player_id, Player};

use crate::service::battle_pass::grant_level_reward;
use crate::store::{players, progress, Store};

#[derive(Clone)]
pub struct PlayerService {
    store: Arc<Store>,
}

impl PlayerService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Registers a player, initializes progress at (level 1, experience 0)
    /// and grants the level-1 reward when the catalog defines one, all in one
    /// transaction.
    pub async fn register(&self, player_id: &str, nickname: &str) -> Result<Player> {
        validate_player_id(player_id)?;
        validate_nickname(nickname)?;

        let player = Player {
            player_id: player_id.to_string(),
            nickname: nickname.to_string(),
            created_at: Utc::now(),
        };

        let player = self
            .store
            .write_tx(move |tx| {
                if players::find_by_id(tx, &player.player_id)?.is_some() {
                    return Err(BattlePassError::PlayerAlreadyExists(player.player_id.clone()));
                }
                if players::find_by_nickname(tx, &player.nickname)?.is_some() {
                    return Err(BattlePassError::PlayerAlreadyExists(format!(
                        "nickname '{}' is taken",
                        player.nickname
                    )));
                }

                players::insert(tx, &player)?;
                progress::insert(tx, &player.player_id)?;
                grant_level_reward(tx, &player.player_id, 1)?;
                Ok(player)
            })
            .await?;

        info!("Registered player {} ({})", player.player_id, player.nickname);
        Ok(player)
    }

    pub async fn get(&self, player_id: &str) -> Result<Player> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();
        self.store
            .read(move |conn| {
                players::find_by_id(conn, &player_id)?
                    .ok_or_else(|| BattlePassError::PlayerNotFound(player_id.clone()))
            })
            .await
    }

    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Player> {
        validate_nickname(nickname)?;
        let nickname = nickname.to_string();
        self.store
            .read(move |conn| {
                players::find_by_nickname(conn, &nickname)?
                    .ok_or_else(|| BattlePassError::PlayerNotFound(nickname.clone()))
            })
            .await
    }

    /// True when no player holds the nickname yet.
    pub async fn nickname_available(&self, nickname: &str) -> Result<bool> {
        validate_nickname(nickname)?;
        let nickname = nickname.to_string();
        self.store
            .read(move |conn| Ok(players::find_by_nickname(conn, &nickname)?.is_none()))
            .await
    }

    /// Changes the player's nickname, enforcing uniqueness.
    pub async fn rename(&self, player_id: &str, nickname: &str) -> Result<()> {
        validate_player_id(player_id)?;
        validate_nickname(nickname)?;
        let player_id = player_id.to_string();
        let nickname = nickname.to_string();

        self.store
            .write_tx(move |tx| {
                if let Some(holder) = players::find_by_nickname(tx, &nickname)? {
                    if holder.player_id != player_id {
                        return Err(BattlePassError::PlayerAlreadyExists(format!(
                            "nickname '{nickname}' is taken"
                        )));
                    }
                }
                if players::update_nickname(tx, &player_id, &nickname)? == 0 {
                    return Err(BattlePassError::PlayerNotFound(player_id.clone()));
                }
                Ok(())
            })
            .await
    }

    /// Deletes the player; progress and ledger rows cascade with it.
    pub async fn remove(&self, player_id: &str) -> Result<()> {
        validate_player_id(player_id)?;
        let player_id = player_id.to_string();

        let removed_id = self
            .store
            .write_tx(move |tx| {
                if players::delete(tx, &player_id)? == 0 {
                    return Err(BattlePassError::PlayerNotFound(player_id.clone()));
                }
                Ok(player_id)
            })
            .await?;

        info!("Removed player {removed_id}");
        Ok(())
    }
}
