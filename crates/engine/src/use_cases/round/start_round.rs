//! Start round use case.

use std::sync::Arc;

use cantstop_domain::PlayerId;

use crate::entities::Players;
use crate::infrastructure::ports::ClockPort;
use crate::use_cases::effects::EffectRouter;
use crate::use_cases::error::GameError;

use super::machine;

pub struct StartRound {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    clock: Arc<dyn ClockPort>,
}

impl StartRound {
    pub fn new(players: Arc<Players>, router: Arc<EffectRouter>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            players,
            router,
            clock,
        }
    }

    /// Open a new round for the player.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Narration, including columns blocked this round
    /// * `Err(GameError)` - No faction, locked out, not checked in, or already playing
    pub async fn execute(&self, player_id: &PlayerId) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let mut session = self.players.load(player_id).await?;

        let round_id =
            machine(&self.router).start_round(&session.player, &mut session.state, now)?;
        self.players.save(&mut session).await?;

        tracing::info!(player_id = %player_id, round_id = %round_id, "Round started");

        let mut messages = vec![format!(
            "{} starts a new round. Roll when ready",
            session.player.nickname()
        )];
        let blocked = session.state.round.disabled_columns();
        if !blocked.is_empty() {
            let columns: Vec<String> = blocked.iter().map(ToString::to_string).collect();
            messages.push(format!(
                "Sweet talk keeps you out of column(s) {} this round",
                columns.join(", ")
            ));
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{clock, now, session, PortMocks};
    use cantstop_domain::{DomainError, Effect, RoundPhase};

    #[tokio::test]
    async fn when_player_unknown_returns_error() {
        let mut mocks = PortMocks::new();
        mocks.players.expect_get().returning(|_| Ok(None));
        let (players, router) = mocks.build();

        let use_case = StartRound::new(players, router, clock());
        let result = use_case
            .execute(&PlayerId::new("ghost").expect("valid id"))
            .await;

        assert!(matches!(result, Err(GameError::Repo(_))));
    }

    #[tokio::test]
    async fn when_locked_out_returns_state_error() {
        let mut locked = session("a");
        let (_, router) = PortMocks::new().build();
        let summary = router
            .apply(&mut locked, vec![Effect::LockoutFor { minutes: 60 }], now())
            .expect("applies");
        assert!(summary.notes.is_empty());

        let mut mocks = PortMocks::new();
        mocks.serve(&locked);
        let (players, router) = mocks.build();

        let use_case = StartRound::new(players, router, clock());
        let result = use_case.execute(locked.id()).await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::InvalidStateTransition(_)))
        ));
    }

    #[tokio::test]
    async fn when_idle_starts_and_saves() {
        let idle = session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&idle);
        mocks
            .players
            .expect_save()
            .withf(|_, state| state.round.phase() == RoundPhase::Active)
            .times(1)
            .returning(|_, _| Ok(1));
        let (players, router) = mocks.build();

        let use_case = StartRound::new(players, router, clock());
        let messages = use_case.execute(idle.id()).await.expect("started");

        assert!(messages[0].contains("starts a new round"));
    }
}
