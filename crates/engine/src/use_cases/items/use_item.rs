//! Use item use case.

use std::sync::Arc;

use cantstop_domain::PlayerId;

use crate::entities::Players;
use crate::infrastructure::ports::{
    ClockPort, ContentCatalog, ItemUseArgs, ItemUseContext, PlayerSnapshot,
};
use crate::use_cases::effects::{pending_line, EffectRouter};
use crate::use_cases::error::GameError;

/// Use item use case.
///
/// Orchestrates: ownership check, the catalog's decision, effect application,
/// one save, then consumption. A rejected use leaves the inventory alone.
pub struct UseItem {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl UseItem {
    pub fn new(
        players: Arc<Players>,
        router: Arc<EffectRouter>,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            router,
            catalog,
            clock,
        }
    }

    /// # Arguments
    /// * `player_id` - The item's owner
    /// * `name` - Display name of the item, matched loosely
    /// * `args` - Target, columns, faces or an inline choice, as the item needs
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        name: &str,
        args: ItemUseArgs,
    ) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let item = self
            .catalog
            .find_item(name)
            .ok_or_else(|| GameError::UnknownItem(name.to_string()))?;
        let item_name = self.catalog.item_name(item);

        let mut session = self.players.load(player_id).await?;
        if !session.inventory.contains(item) {
            return Err(GameError::ItemNotOwned(item_name));
        }

        let ctx = ItemUseContext {
            player: PlayerSnapshot::capture(&session.player, &session.state, &session.inventory),
            item,
            args,
        };
        let outcome = self.catalog.use_item(&ctx)?;
        let keep_item = outcome.keep_item;
        let (message, effects) = outcome.into_parts();

        let mut summary = self.router.apply(&mut session, effects, now)?;
        session.state.round.set_last_used_item(item);
        if !keep_item {
            summary.inventory.push((item, -1));
        }

        tracing::info!(
            player_id = %player_id,
            item = %item,
            consumed = !keep_item,
            "Item used"
        );

        let mut messages = vec![format!("You use {item_name}")];
        if !message.is_empty() {
            messages.push(message);
        }
        messages.extend(self.router.commit(&mut session, summary, now).await?);
        messages.extend(pending_line(&session));
        Ok(messages)
    }
}
