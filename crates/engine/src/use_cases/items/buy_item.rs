//! Buy item use case.

use std::sync::Arc;

use cantstop_domain::{DomainError, EffectSummary, PlayerId};

use crate::entities::Players;
use crate::infrastructure::ports::{ClockPort, SaleOutcome, ShopRepo};
use crate::use_cases::effects::EffectRouter;
use crate::use_cases::error::GameError;

/// Buy item use case.
///
/// Orchestrates: listing lookup, purchase checks, the global stock count,
/// payment and delivery into the inventory.
pub struct BuyItem {
    players: Arc<Players>,
    shop: Arc<dyn ShopRepo>,
    router: Arc<EffectRouter>,
    clock: Arc<dyn ClockPort>,
}

impl BuyItem {
    pub fn new(
        players: Arc<Players>,
        shop: Arc<dyn ShopRepo>,
        router: Arc<EffectRouter>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            shop,
            router,
            clock,
        }
    }

    /// # Arguments
    /// * `player_id` - The buyer
    /// * `name` - Display name of the item, matched loosely
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Receipt lines
    /// * `Err(GameError)` - Unknown, locked, restricted, sold out or unaffordable
    pub async fn execute(&self, player_id: &PlayerId, name: &str) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let listing = self
            .shop
            .get_by_name(name)
            .await?
            .ok_or_else(|| GameError::UnknownItem(name.to_string()))?;
        if listing.item.is_hidden() {
            return Err(DomainError::resource(format!("{} is not for sale", listing.name)).into());
        }

        let mut session = self.players.load(player_id).await?;
        let owned = session.inventory.quantity(listing.item);
        listing.check_purchase(session.player.faction(), owned)?;

        let half_price = session.state.round.take_half_price();
        let price = listing.price_for(half_price);
        session.player.spend(price, &listing.name)?;

        let remaining = match self.shop.try_record_sale(listing.item).await? {
            SaleOutcome::Recorded { remaining } => remaining,
            SaleOutcome::SoldOut => {
                return Err(DomainError::resource(format!("{} is sold out", listing.name)).into())
            }
            SaleOutcome::NotListed => return Err(GameError::UnknownItem(name.to_string())),
        };

        tracing::info!(
            player_id = %player_id,
            item = %listing.item,
            price,
            half_price,
            "Item bought"
        );

        let mut messages = vec![format!("Bought {} for {price}", listing.name)];
        if half_price {
            messages.push("Your coupon halved the price".to_string());
        }
        if let Some(left) = remaining {
            messages.push(format!("{left} left in stock"));
        }
        let summary = EffectSummary {
            inventory: vec![(listing.item, 1)],
            ..EffectSummary::default()
        };
        messages.extend(self.router.commit(&mut session, summary, now).await?);
        Ok(messages)
    }
}
