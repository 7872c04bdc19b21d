//! Administrative catalog management.
//!
//! The progression core only reads the catalog; these operations exist for
//! operators and must preserve the one-reward-per-level invariant the core
//! relies on.

use std::sync::Arc;

use tracing::info;

use battlepass_common::error::{BattlePassError, Result};
use battlepass_common::reward::{Reward, RewardDefinition};

use crate::store::{catalog, Store};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<Store>,
}

impl CatalogService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// All definitions, ordered by level.
    pub async fn list(&self) -> Result<Vec<RewardDefinition>> {
        self.store.read(catalog::find_all).await
    }

    pub async fn create(&self, level: u32, reward: Reward) -> Result<RewardDefinition> {
        if level < 1 {
            return Err(BattlePassError::InvalidArgument(
                "level must be at least 1".into(),
            ));
        }
        reward.validate()?;

        let created = self
            .store
            .write_tx(move |tx| catalog::insert(tx, level, &reward))
            .await?;
        info!("Created reward definition {} for level {}", created.id, created.level);
        Ok(created)
    }

    pub async fn update(&self, id: i64, reward: Reward) -> Result<RewardDefinition> {
        reward.validate()?;

        self.store
            .write_tx(move |tx| {
                if catalog::update(tx, id, &reward)? == 0 {
                    return Err(BattlePassError::RewardNotFound(format!(
                        "no reward definition with id {id}"
                    )));
                }
                catalog::find_by_id(tx, id)?.ok_or_else(|| {
                    BattlePassError::Storage("definition vanished during update".into())
                })
            })
            .await
    }

    /// Removes a definition. Refused while any grant references it, so the
    /// ledger never ends up pointing at a missing definition.
    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store
            .write_tx(move |tx| {
                if catalog::find_by_id(tx, id)?.is_none() {
                    return Err(BattlePassError::RewardNotFound(format!(
                        "no reward definition with id {id}"
                    )));
                }
                if catalog::grant_count(tx, id)? > 0 {
                    return Err(BattlePassError::InvalidArgument(
                        "reward has been granted to players and cannot be deleted".into(),
                    ));
                }
                catalog::delete(tx, id)?;
                Ok(())
            })
            .await
    }
}
