use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item: ItemId,
    pub quantity: u32,
}

/// Items a player holds, keyed by id. Zero quantities are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemId, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, item: ItemId) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.quantity(item) > 0
    }

    pub fn entries(&self) -> impl Iterator<Item = InventoryEntry> + '_ {
        self.items.iter().map(|(item, quantity)| InventoryEntry {
            item: *item,
            quantity: *quantity,
        })
    }

    /// Entries that can be used or sold, i.e. not keepsakes.
    pub fn usable(&self) -> impl Iterator<Item = InventoryEntry> + '_ {
        self.entries().filter(|entry| !entry.item.is_hidden())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let held = self.items.entry(item).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    pub fn remove(&mut self, item: ItemId, quantity: u32) -> Result<(), DomainError> {
        let held = self.quantity(item);
        if held < quantity {
            return Err(DomainError::resource(format!(
                "need {quantity} of {item}, have {held}"
            )));
        }
        if held == quantity {
            self.items.remove(&item);
        } else {
            self.items.insert(item, held - quantity);
        }
        Ok(())
    }

    /// Signed change as carried by `Effect::InventoryDelta`.
    pub fn apply_delta(&mut self, item: ItemId, delta: i32) -> Result<(), DomainError> {
        let amount = delta.unsigned_abs();
        if delta >= 0 {
            self.add(item, amount);
            Ok(())
        } else {
            self.remove(item, amount)
        }
    }
}
