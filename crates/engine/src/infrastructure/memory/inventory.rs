use async_trait::async_trait;
use cantstop_domain::{Inventory, ItemId, PlayerId};
use dashmap::DashMap;

use crate::infrastructure::ports::{InventoryRepo, RepoError};

/// Inventories keyed by player. A delta holds the player's shard lock for the
/// whole read-modify-write.
#[derive(Default)]
pub struct InMemoryInventoryRepo {
    inventories: DashMap<PlayerId, Inventory>,
}

impl InMemoryInventoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepo for InMemoryInventoryRepo {
    async fn get(&self, player: &PlayerId) -> Result<Inventory, RepoError> {
        Ok(self
            .inventories
            .get(player)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn apply_delta(
        &self,
        player: &PlayerId,
        item: ItemId,
        delta: i32,
    ) -> Result<u32, RepoError> {
        let mut inventory = self.inventories.entry(player.clone()).or_default();
        inventory
            .apply_delta(item, delta)
            .map_err(|e| RepoError::constraint(e.to_string()))?;
        Ok(inventory.quantity(item))
    }
}
