//! Check-in use case.

use std::sync::Arc;

use cantstop_domain::PlayerId;

use crate::entities::Players;
use crate::use_cases::effects::EffectRouter;
use crate::use_cases::error::GameError;

use super::machine;

pub struct CheckIn {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
}

impl CheckIn {
    pub fn new(players: Arc<Players>, router: Arc<EffectRouter>) -> Self {
        Self { players, router }
    }

    /// Unlock the player after a finished round and thaw frozen columns.
    pub async fn execute(&self, player_id: &PlayerId) -> Result<Vec<String>, GameError> {
        let mut session = self.players.load(player_id).await?;
        machine(&self.router).check_in(&mut session.state)?;
        self.players.save(&mut session).await?;

        tracing::info!(player_id = %player_id, "Checked in");
        Ok(vec![format!(
            "{} checked in. Start a new round when ready",
            session.player.nickname()
        )])
    }
}
