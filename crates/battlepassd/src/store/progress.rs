//! Battle pass progress table access.

use rusqlite::{params, Connection, OptionalExtension};

use battlepass_common::error::Result;
use battlepass_common::progression::PlayerProgress;

use super::storage_err;

pub fn find_by_player(conn: &Connection, player_id: &str) -> Result<Option<PlayerProgress>> {
    conn.query_row(
        "SELECT player_id, level, experience FROM battle_passes WHERE player_id = ?1",
        params![player_id],
        |row| {
            Ok(PlayerProgress {
                player_id: row.get(0)?,
                level: row.get(1)?,
                experience: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(storage_err)
}

/// Creates the initial (level 1, experience 0) row.
pub fn insert(conn: &Connection, player_id: &str) -> Result<PlayerProgress> {
    conn.execute(
        "INSERT INTO battle_passes (player_id, level, experience) VALUES (?1, 1, 0)",
        params![player_id],
    )
    .map_err(storage_err)?;
    Ok(PlayerProgress::new(player_id))
}

/// Fetches the player's progress, creating it lazily on first touch.
pub fn ensure(conn: &Connection, player_id: &str) -> Result<PlayerProgress> {
    match find_by_player(conn, player_id)? {
        Some(progress) => Ok(progress),
        None => insert(conn, player_id),
    }
}

pub fn update(conn: &Connection, player_id: &str, level: u32, experience: u32) -> Result<()> {
    conn.execute(
        "UPDATE battle_passes SET level = ?2, experience = ?3 WHERE player_id = ?1",
        params![player_id, level, experience],
    )
    .map_err(storage_err)?;
    Ok(())
}
