//! Claim reward use case.
//!
//! Artwork handed in at check-in earns points: the kind's base value times
//! the number of pieces times an event multiplier.

use std::sync::Arc;

use cantstop_domain::{DomainError, PlayerId};
use cantstop_shared::RewardKind;

use crate::entities::Players;
use crate::use_cases::error::GameError;

pub struct ClaimReward {
    players: Arc<Players>,
}

impl ClaimReward {
    pub fn new(players: Arc<Players>) -> Self {
        Self { players }
    }

    pub async fn execute(
        &self,
        player_id: &PlayerId,
        kind: RewardKind,
        count: u32,
        multiplier: u32,
    ) -> Result<Vec<String>, GameError> {
        if count == 0 || multiplier == 0 {
            return Err(DomainError::validation("count and multiplier must be at least 1").into());
        }
        let points = kind
            .base_points()
            .checked_mul(count)
            .and_then(|points| points.checked_mul(multiplier))
            .ok_or_else(|| DomainError::validation("that reward is too large"))?;

        let mut session = self.players.load(player_id).await?;
        session.player.adjust_score(i64::from(points));
        self.players.save(&mut session).await?;

        tracing::info!(player_id = %player_id, kind = ?kind, count, multiplier, points, "Reward claimed");
        Ok(vec![format!(
            "Thanks for the artwork! +{points} (score {})",
            session.player.current_score()
        )])
    }
}
