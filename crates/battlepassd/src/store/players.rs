//! Player table access.

use rusqlite::{params, Connection, OptionalExtension};

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::player::Player;

use super::{is_unique_violation, storage_err};

pub fn insert(conn: &Connection, player: &Player) -> Result<()> {
    conn.execute(
        "INSERT INTO players (player_id, nickname, created_at) VALUES (?1, ?2, ?3)",
        params![player.player_id, player.nickname, player.created_at],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            BattlePassError::PlayerAlreadyExists(player.player_id.clone())
        } else {
            storage_err(e)
        }
    })?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, player_id: &str) -> Result<Option<Player>> {
    conn.query_row(
        "SELECT player_id, nickname, created_at FROM players WHERE player_id = ?1",
        params![player_id],
        row_to_player,
    )
    .optional()
    .map_err(storage_err)
}

pub fn find_by_nickname(conn: &Connection, nickname: &str) -> Result<Option<Player>> {
    conn.query_row(
        "SELECT player_id, nickname, created_at FROM players WHERE nickname = ?1",
        params![nickname],
        row_to_player,
    )
    .optional()
    .map_err(storage_err)
}

/// Returns the number of rows updated (0 when the player is unknown).
pub fn update_nickname(conn: &Connection, player_id: &str, nickname: &str) -> Result<usize> {
    conn.execute(
        "UPDATE players SET nickname = ?2 WHERE player_id = ?1",
        params![player_id, nickname],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            BattlePassError::PlayerAlreadyExists(format!("nickname '{nickname}' is taken"))
        } else {
            storage_err(e)
        }
    })
}

/// Deletes the player; progress and ledger rows cascade.
pub fn delete(conn: &Connection, player_id: &str) -> Result<usize> {
    conn.execute("DELETE FROM players WHERE player_id = ?1", params![player_id])
        .map_err(storage_err)
}

fn row_to_player(row: &rusqlite::Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        player_id: row.get(0)?,
        nickname: row.get(1)?,
        created_at: row.get(2)?,
    })
}
