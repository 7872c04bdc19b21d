//! Player reward ledger access.
//!
//! `UNIQUE(player_id, reward_id)` is the source of truth for the
//! at-most-one-grant rule: a racing insert loses with a uniqueness violation
//! that surfaces as `RewardAlreadyGranted`, never as corrupted state.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::reward::{GrantedReward, RewardGrant};

use super::catalog::decode_reward;
use super::{is_unique_violation, storage_err};

pub fn insert_grant(conn: &Connection, player_id: &str, reward_id: i64) -> Result<RewardGrant> {
    let granted_at = Utc::now();
    conn.execute(
        "INSERT INTO player_rewards (player_id, reward_id, claimed, granted_at)
         VALUES (?1, ?2, 0, ?3)",
        params![player_id, reward_id, granted_at],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            BattlePassError::RewardAlreadyGranted
        } else {
            storage_err(e)
        }
    })?;

    Ok(RewardGrant {
        id: conn.last_insert_rowid(),
        player_id: player_id.to_string(),
        reward_id,
        claimed: false,
        granted_at,
    })
}

pub fn find_by_player_and_reward(
    conn: &Connection,
    player_id: &str,
    reward_id: i64,
) -> Result<Option<RewardGrant>> {
    conn.query_row(
        "SELECT id, player_id, reward_id, claimed, granted_at
         FROM player_rewards WHERE player_id = ?1 AND reward_id = ?2",
        params![player_id, reward_id],
        row_to_grant,
    )
    .optional()
    .map_err(storage_err)
}

/// The player's full ledger joined with catalog definitions, ordered by level.
pub fn find_by_player(conn: &Connection, player_id: &str) -> Result<Vec<GrantedReward>> {
    query_granted(
        conn,
        "SELECT pr.id, pr.player_id, pr.reward_id, pr.claimed, pr.granted_at,
                bpr.level, bpr.reward
         FROM player_rewards pr
         JOIN battle_pass_rewards bpr ON bpr.id = pr.reward_id
         WHERE pr.player_id = ?1
         ORDER BY bpr.level",
        player_id,
    )
}

/// Unclaimed subset of [`find_by_player`].
pub fn find_unclaimed_by_player(conn: &Connection, player_id: &str) -> Result<Vec<GrantedReward>> {
    query_granted(
        conn,
        "SELECT pr.id, pr.player_id, pr.reward_id, pr.claimed, pr.granted_at,
                bpr.level, bpr.reward
         FROM player_rewards pr
         JOIN battle_pass_rewards bpr ON bpr.id = pr.reward_id
         WHERE pr.player_id = ?1 AND pr.claimed = 0
         ORDER BY bpr.level",
        player_id,
    )
}

/// Flips the claimed flag, guarded so the transition happens at most once.
/// Returns the number of rows updated.
pub fn mark_claimed(conn: &Connection, grant_id: i64) -> Result<usize> {
    conn.execute(
        "UPDATE player_rewards SET claimed = 1 WHERE id = ?1 AND claimed = 0",
        params![grant_id],
    )
    .map_err(storage_err)
}

fn query_granted(conn: &Connection, sql: &str, player_id: &str) -> Result<Vec<GrantedReward>> {
    let mut stmt = conn.prepare(sql).map_err(storage_err)?;
    let rows = stmt
        .query_map(params![player_id], |row| {
            let grant = row_to_grant(row)?;
            let level: u32 = row.get(5)?;
            let raw: String = row.get(6)?;
            Ok((grant, level, raw))
        })
        .map_err(storage_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(storage_err)?;

    rows.into_iter()
        .map(|(grant, level, raw)| {
            Ok(GrantedReward {
                grant,
                level,
                reward: decode_reward(&raw)?,
            })
        })
        .collect()
}

fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<RewardGrant> {
    Ok(RewardGrant {
        id: row.get(0)?,
        player_id: row.get(1)?,
        reward_id: row.get(2)?,
        claimed: row.get(3)?,
        granted_at: row.get(4)?,
    })
}
