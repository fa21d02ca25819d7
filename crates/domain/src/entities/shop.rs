use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ItemId;
use crate::value_objects::Faction;

/// A shop entry. Items appear for sale once someone finds them on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListing {
    pub item: ItemId,
    pub name: String,
    pub price: u32,
    /// Only this faction may buy or pick it up.
    pub faction: Option<Faction>,
    /// Total copies that may ever be sold.
    pub global_limit: Option<u32>,
    pub player_limit: u32,
    pub unlocked: bool,
    pub sold: u32,
}

impl ShopListing {
    pub fn new(item: ItemId, name: impl Into<String>, price: u32) -> Self {
        Self {
            item,
            name: name.into(),
            price,
            faction: None,
            global_limit: None,
            player_limit: 1,
            unlocked: false,
            sold: 0,
        }
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_global_limit(mut self, limit: u32) -> Self {
        self.global_limit = Some(limit);
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }

    pub fn allows(&self, faction: Option<Faction>) -> bool {
        match self.faction {
            Some(required) => faction == Some(required),
            None => true,
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        self.global_limit
            .map(|limit| limit.saturating_sub(self.sold))
    }

    pub fn price_for(&self, half_price: bool) -> u32 {
        if half_price {
            self.price / 2
        } else {
            self.price
        }
    }

    /// Checks that do not depend on global sales.
    pub fn check_purchase(&self, faction: Option<Faction>, owned: u32) -> Result<(), DomainError> {
        if !self.unlocked {
            return Err(DomainError::resource(format!(
                "{} is not on sale yet",
                self.name
            )));
        }
        if !self.allows(faction) {
            return Err(DomainError::resource(format!(
                "{} is restricted to another faction",
                self.name
            )));
        }
        if owned >= self.player_limit {
            return Err(DomainError::resource(format!(
                "you already hold the maximum of {}",
                self.name
            )));
        }
        if self.remaining() == Some(0) {
            return Err(DomainError::resource(format!("{} is sold out", self.name)));
        }
        Ok(())
    }
}
