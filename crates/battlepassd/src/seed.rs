//! Stock reward catalog for fresh deployments.

use battlepass_common::error::Result;
use battlepass_common::reward::Reward;

use crate::store::{catalog, Store};

/// The shipped level→reward table.
fn default_rewards() -> Vec<(u32, Reward)> {
    vec![
        (1, Reward::Gold { amount: 100 }),
        (2, Reward::ProfilePicture { id: 1 }),
        (3, Reward::ProfileBackground { id: 1 }),
        (4, Reward::ProfileAvatar { id: 1 }),
        (
            5,
            Reward::Powerup {
                powerup: "joker".into(),
                quantity: 1,
            },
        ),
        (6, Reward::Gold { amount: 15 }),
        (7, Reward::ProfilePicture { id: 2 }),
        (8, Reward::ProfileBackground { id: 2 }),
        (9, Reward::ProfileAvatar { id: 2 }),
        (
            10,
            Reward::Powerup {
                powerup: "lead".into(),
                quantity: 1,
            },
        ),
    ]
}

/// Inserts the stock catalog when the table is empty. Returns the number of
/// definitions inserted (0 when the catalog already has content).
pub async fn seed_default_catalog(store: &Store) -> Result<usize> {
    store
        .write_tx(|tx| {
            if !catalog::find_all(tx)?.is_empty() {
                return Ok(0);
            }
            let rewards = default_rewards();
            let count = rewards.len();
            for (level, reward) in rewards {
                catalog::insert(tx, level, &reward)?;
            }
            Ok(count)
        })
        .await
}
