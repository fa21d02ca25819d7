//! End round use case.

use std::sync::Arc;

use cantstop_domain::{EffectSummary, PassiveEnd, PlayerId};

use crate::entities::Players;
use crate::infrastructure::ports::ClockPort;
use crate::use_cases::effects::EffectRouter;
use crate::use_cases::error::GameError;

use super::machine;

/// How the player leaves the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMode {
    /// Bank the progress: temporary markers become permanent.
    Active,
    /// Give up: temporary progress is lost unless a retry is armed.
    Passive,
}

pub struct EndRound {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    clock: Arc<dyn ClockPort>,
}

impl EndRound {
    pub fn new(players: Arc<Players>, router: Arc<EffectRouter>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            players,
            router,
            clock,
        }
    }

    pub async fn execute(
        &self,
        player_id: &PlayerId,
        mode: EndMode,
    ) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let mut session = self.players.load(player_id).await?;
        let machine = machine(&self.router);

        let mut messages = Vec::new();
        let summary = match mode {
            EndMode::Active => {
                let end = machine.end_round_active(&mut session.state)?;
                messages.push("Round banked: your markers are now permanent".to_string());
                EffectSummary {
                    newly_topped: end.newly_topped,
                    won: end.won,
                    ..EffectSummary::default()
                }
            }
            EndMode::Passive => {
                match machine.end_round_passive(&mut session.state)? {
                    PassiveEnd::Retried => messages
                        .push("Your retry is spent. The round goes on, markers untouched".to_string()),
                    PassiveEnd::Ended => messages
                        .push("You stop here. This round's progress is lost".to_string()),
                }
                EffectSummary::default()
            }
        };

        tracing::info!(player_id = %player_id, mode = ?mode, "Round ended");

        messages.extend(self.router.commit(&mut session, summary, now).await?);
        if session.state.round.needs_check_in() {
            messages.push("Check in to play the next round".to_string());
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::CascadeSave;
    use crate::test_fixtures::{active_session, clock, column, now, PortMocks};
    use cantstop_domain::{AchievementId, DomainError, Effect, RoundPhase};

    #[tokio::test]
    async fn when_forced_rounds_remain_returns_state_error() {
        let mut session = active_session("a");
        let (_, router) = PortMocks::new().build();
        router
            .apply(&mut session, vec![Effect::ForceRounds { count: 1 }], now())
            .expect("applies");

        let mut mocks = PortMocks::new();
        mocks.serve(&session);
        let (players, router) = mocks.build();

        let use_case = EndRound::new(players, router, clock());
        let result = use_case.execute(session.id(), EndMode::Active).await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::InvalidStateTransition(_)))
        ));
    }

    #[tokio::test]
    async fn banking_a_topped_column_runs_the_cascade() {
        let mut session = active_session("a");
        let (_, router) = PortMocks::new().build();
        // Column 3 is three cells tall.
        router
            .apply(
                &mut session,
                vec![Effect::PositionDelta {
                    column: column(3),
                    delta: 3,
                }],
                now(),
            )
            .expect("applies");

        let mut mocks = PortMocks::new();
        mocks.serve(&session);
        mocks
            .records
            .expect_record_first_clear()
            .returning(|_, _| Ok(true));
        mocks
            .players
            .expect_save_with_cascade()
            .withf(|player, state, topped| {
                state.round.phase() == RoundPhase::Locked
                    && state.markers.is_topped(column(3))
                    && player.current_score() == 130
                    && topped.to_vec() == vec![column(3)]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(CascadeSave {
                    version: 5,
                    knocked: vec![(column(3), Vec::new())],
                })
            });
        mocks
            .achievements
            .expect_grant()
            .withf(|_, id, _| id.as_str() == AchievementId::first_clear(column(3)).as_str())
            .returning(|_, _, _| Ok(true));
        let (players, router) = mocks.build();

        let use_case = EndRound::new(players, router, clock());
        let messages = use_case
            .execute(session.id(), EndMode::Active)
            .await
            .expect("banked");

        assert!(messages.iter().any(|m| m == "Column 3 topped! +10"));
        assert_eq!(messages.last().map(String::as_str), Some("Check in to play the next round"));
    }

    #[tokio::test]
    async fn giving_up_with_a_retry_keeps_playing() {
        let mut session = active_session("a");
        let (_, router) = PortMocks::new().build();
        router
            .apply(&mut session, vec![Effect::RetryOnFail], now())
            .expect("applies");

        let mut mocks = PortMocks::new();
        mocks.serve(&session);
        mocks
            .players
            .expect_save()
            .withf(|_, state| state.round.phase() == RoundPhase::Active && !state.round.retry_on_fail())
            .returning(|_, _| Ok(2));
        let (players, router) = mocks.build();

        let use_case = EndRound::new(players, router, clock());
        let messages = use_case
            .execute(session.id(), EndMode::Passive)
            .await
            .expect("retried");

        assert!(messages[0].starts_with("Your retry is spent"));
    }
}
