//! Choose faction use case.

use std::sync::Arc;

use cantstop_domain::{Faction, PlayerId};

use crate::entities::Players;
use crate::use_cases::error::GameError;

pub struct ChooseFaction {
    players: Arc<Players>,
}

impl ChooseFaction {
    pub fn new(players: Arc<Players>) -> Self {
        Self { players }
    }

    /// Join a faction, or switch to the other one.
    pub async fn execute(&self, player_id: &PlayerId, faction: &str) -> Result<Vec<String>, GameError> {
        let faction: Faction = faction.parse()?;
        let mut session = self.players.load(player_id).await?;
        session.player.choose_faction(faction)?;
        self.players.save(&mut session).await?;

        tracing::info!(player_id = %player_id, faction = %faction, "Faction chosen");
        Ok(vec![format!(
            "{} joins the {faction}",
            session.player.nickname()
        )])
    }
}
