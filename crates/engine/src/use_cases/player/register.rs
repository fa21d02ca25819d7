//! Register use case.

use std::sync::Arc;

use cantstop_domain::{Player, PlayerId};

use crate::entities::Players;
use crate::infrastructure::ports::ClockPort;
use crate::use_cases::error::GameError;

pub struct Register {
    players: Arc<Players>,
    clock: Arc<dyn ClockPort>,
}

impl Register {
    pub fn new(players: Arc<Players>, clock: Arc<dyn ClockPort>) -> Self {
        Self { players, clock }
    }

    /// Create the player unless they already exist.
    ///
    /// # Returns
    /// * `Ok((Player, true))` - Newly created
    /// * `Ok((Player, false))` - Already known; the stored record is returned unchanged
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        nickname: &str,
    ) -> Result<(Player, bool), GameError> {
        let player = Player::new(player_id.clone(), nickname, self.clock.now())?;
        let (stored, created) = self.players.insert_if_absent(&player).await?;
        if created {
            tracing::info!(player_id = %player_id, nickname = %stored.nickname(), "Player registered");
        }
        Ok((stored, created))
    }
}
