//! Reward catalog table access.
//!
//! The catalog is read-only for the progression core; the administrative
//! surface mutates it while preserving the one-reward-per-level invariant.

use rusqlite::{params, Connection, OptionalExtension};

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::reward::{Reward, RewardDefinition};

use super::{is_unique_violation, storage_err};

pub fn find_by_level(conn: &Connection, level: u32) -> Result<Option<RewardDefinition>> {
    conn.query_row(
        "SELECT id, level, reward FROM battle_pass_rewards WHERE level = ?1",
        params![level],
        row_to_definition,
    )
    .optional()
    .map_err(storage_err)?
    .transpose()
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<RewardDefinition>> {
    conn.query_row(
        "SELECT id, level, reward FROM battle_pass_rewards WHERE id = ?1",
        params![id],
        row_to_definition,
    )
    .optional()
    .map_err(storage_err)?
    .transpose()
}

/// All definitions, ordered by level.
pub fn find_all(conn: &Connection) -> Result<Vec<RewardDefinition>> {
    let mut stmt = conn
        .prepare("SELECT id, level, reward FROM battle_pass_rewards ORDER BY level")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map([], row_to_definition)
        .map_err(storage_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(storage_err)?;
    rows.into_iter().collect()
}

pub fn insert(conn: &Connection, level: u32, reward: &Reward) -> Result<RewardDefinition> {
    let payload = encode_reward(reward)?;
    conn.execute(
        "INSERT INTO battle_pass_rewards (level, reward) VALUES (?1, ?2)",
        params![level, payload],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            BattlePassError::InvalidArgument(format!("a reward for level {level} already exists"))
        } else {
            storage_err(e)
        }
    })?;
    Ok(RewardDefinition {
        id: conn.last_insert_rowid(),
        level,
        reward: reward.clone(),
    })
}

/// Returns the number of rows updated (0 when the id is unknown).
pub fn update(conn: &Connection, id: i64, reward: &Reward) -> Result<usize> {
    let payload = encode_reward(reward)?;
    conn.execute(
        "UPDATE battle_pass_rewards SET reward = ?2 WHERE id = ?1",
        params![id, payload],
    )
    .map_err(storage_err)
}

/// Returns the number of rows deleted (0 when the id is unknown).
pub fn delete(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM battle_pass_rewards WHERE id = ?1", params![id])
        .map_err(storage_err)
}

/// How many ledger rows reference this definition.
pub fn grant_count(conn: &Connection, id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM player_rewards WHERE reward_id = ?1",
        params![id],
        |row| row.get(0),
    )
    .map_err(storage_err)
}

fn encode_reward(reward: &Reward) -> Result<String> {
    serde_json::to_string(reward)
        .map_err(|e| BattlePassError::Storage(format!("failed to encode reward payload: {e}")))
}

pub(crate) fn decode_reward(raw: &str) -> Result<Reward> {
    serde_json::from_str(raw)
        .map_err(|e| BattlePassError::Storage(format!("corrupt reward payload: {e}")))
}

fn row_to_definition(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<RewardDefinition>> {
    let id: i64 = row.get(0)?;
    let level: u32 = row.get(1)?;
    let raw: String = row.get(2)?;
    Ok(decode_reward(&raw).map(|reward| RewardDefinition { id, level, reward }))
}
