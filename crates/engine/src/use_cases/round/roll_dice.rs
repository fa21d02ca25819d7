//! Roll dice use case.

use std::sync::Arc;

use cantstop_domain::{EffectSummary, PlayerId, RollOutcome, VoidReason};
use cantstop_shared::RollView;

use crate::entities::Players;
use crate::infrastructure::ports::{ClockPort, RandomPort};
use crate::use_cases::effects::EffectRouter;
use crate::use_cases::error::GameError;

use super::machine;

/// Narration plus the playable pairs when the roll stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub messages: Vec<String>,
    pub roll: Option<RollView>,
}

pub struct RollDice {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl RollDice {
    pub fn new(
        players: Arc<Players>,
        router: Arc<EffectRouter>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            router,
            random,
            clock,
        }
    }

    /// Roll for the active round.
    ///
    /// # Arguments
    /// * `player_id` - The rolling player
    /// * `count` - Dice the player expects to roll; must match the armed count
    ///
    /// # Returns
    /// * `Ok(RollResult)` - The roll and what it allows, or why it does not count
    /// * `Err(GameError)` - Not playing, a choice is pending, or the roll is unaffordable
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        count: Option<u8>,
    ) -> Result<RollResult, GameError> {
        let now = self.clock.now();
        let mut session = self.players.load(player_id).await?;

        let random = self.random.clone();
        let mut dice = move || u8::try_from(random.gen_range(1, 6)).unwrap_or(1);
        let report = machine(&self.router).roll(
            &mut session.player,
            &mut session.state,
            count,
            &mut dice,
            now,
        )?;

        let mut messages = Vec::new();
        if report.free_roll_used {
            messages.push("Free roll used".to_string());
        } else if report.charged > 0 {
            messages.push(format!("Paid {} for the roll", report.charged));
        }

        let mut roll = None;
        match &report.outcome {
            RollOutcome::Skipped { remaining } => {
                messages.push(format!(
                    "This roll is skipped, {remaining} more to sit out"
                ));
            }
            RollOutcome::Rolled {
                roll: dice_roll,
                playable,
                bonus_die,
            } => {
                messages.push(format!("Rolled {}", faces(dice_roll.faces())));
                let pairs: Vec<String> = playable.iter().map(ToString::to_string).collect();
                messages.push(format!("Playable: {}", pairs.join(" ")));
                if let Some(face) = bonus_die {
                    messages.push(format!("The odds favour you: bonus die {face}"));
                }
                roll = Some(RollView {
                    faces: dice_roll.faces().to_vec(),
                    pairs: playable.iter().map(|pair| pair.values()).collect(),
                });
            }
            RollOutcome::Voided { faces: shown, reason } => {
                messages.push(format!("Rolled {}", faces(shown)));
                messages.push(format!("{}: the roll does not count", void_text(reason)));
            }
            RollOutcome::Rescued { faces: shown } => {
                messages.push(format!("Rolled {}", faces(shown)));
                messages.push("Nothing playable, but your retry keeps the round alive".to_string());
            }
            RollOutcome::Failed {
                faces: shown,
                failures,
            } => {
                messages.push(format!("Rolled {}", faces(shown)));
                messages.push(format!(
                    "Nothing playable. The round fails and its progress is lost (failure #{failures})"
                ));
            }
        }

        tracing::info!(
            player_id = %player_id,
            charged = report.charged,
            outcome = outcome_name(&report.outcome),
            "Dice rolled"
        );

        let summary = EffectSummary {
            achievements: report.achievements,
            ..EffectSummary::default()
        };
        messages.extend(self.router.commit(&mut session, summary, now).await?);
        Ok(RollResult { messages, roll })
    }
}

fn faces(values: &[u8]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn void_text(reason: &VoidReason) -> String {
    match reason {
        VoidReason::ExtraDie { face } => format!("The extra die shows {face}"),
        VoidReason::OddEven { odd } => format!("Only {odd} odd face(s)"),
        VoidReason::Math { distinct } => format!("Only {distinct} distinct sums"),
    }
}

fn outcome_name(outcome: &RollOutcome) -> &'static str {
    match outcome {
        RollOutcome::Skipped { .. } => "skipped",
        RollOutcome::Rolled { .. } => "rolled",
        RollOutcome::Voided { .. } => "voided",
        RollOutcome::Rescued { .. } => "rescued",
        RollOutcome::Failed { .. } => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ScriptedRandom;
    use crate::test_fixtures::{active_session, clock, now, session, PortMocks};
    use cantstop_domain::{AchievementId, DomainError, Effect, RoundPhase};

    #[tokio::test]
    async fn when_no_round_returns_state_error() {
        let idle = session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&idle);
        let (players, router) = mocks.build();

        let use_case = RollDice::new(players, router, Arc::new(ScriptedRandom::new([])), clock());
        let result = use_case.execute(idle.id(), None).await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::InvalidStateTransition(_)))
        ));
    }

    #[tokio::test]
    async fn when_wrong_dice_count_returns_validation_error() {
        let active = active_session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&active);
        let (players, router) = mocks.build();

        let use_case = RollDice::new(players, router, Arc::new(ScriptedRandom::new([])), clock());
        let result = use_case.execute(active.id(), Some(5)).await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn rolled_dice_are_charged_and_reported() {
        let active = active_session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&active);
        mocks
            .players
            .expect_save()
            .withf(|player, state| player.current_score() == 90 && state.round.last_roll().is_some())
            .times(1)
            .returning(|_, _| Ok(2));
        let (players, router) = mocks.build();

        let random = Arc::new(ScriptedRandom::new([1, 2, 3, 4, 5, 6]));
        let use_case = RollDice::new(players, router, random, clock());
        let result = use_case.execute(active.id(), Some(6)).await.expect("rolled");

        assert_eq!(result.messages[0], "Paid 10 for the roll");
        assert_eq!(result.messages[1], "Rolled 1 2 3 4 5 6");
        let view = result.roll.expect("roll stands");
        assert_eq!(view.faces, vec![1, 2, 3, 4, 5, 6]);
        assert!(view.pairs.contains(&[6, 15]));
    }

    #[tokio::test]
    async fn all_ones_grants_the_hidden_achievement() {
        let mut active = active_session("a");
        let (_, router) = PortMocks::new().build();
        router
            .apply(
                &mut active,
                vec![Effect::FixNextRoll {
                    faces: vec![1, 1, 1, 1, 1, 1],
                }],
                now(),
            )
            .expect("armed");

        let mut mocks = PortMocks::new();
        mocks.serve(&active);
        mocks.accept_saves();
        mocks
            .achievements
            .expect_grant()
            .withf(|_, id, _| *id == AchievementId::all_ones())
            .times(1)
            .returning(|_, _, _| Ok(true));
        let (players, router) = mocks.build();

        let use_case = RollDice::new(players, router, Arc::new(ScriptedRandom::new([])), clock());
        let result = use_case.execute(active.id(), None).await.expect("rolled");

        assert!(result
            .messages
            .iter()
            .any(|m| m == "Achievement unlocked: Silent Thunder"));
        assert_eq!(result.roll.expect("roll stands").pairs, vec![[3, 3]]);
    }

    #[tokio::test]
    async fn a_failed_roll_ends_the_round() {
        let mut active = active_session("a");
        let (_, router) = PortMocks::new().build();
        // The only pair this roll makes is (3, 4), and both columns are topped.
        for column in [3, 4] {
            router
                .apply(
                    &mut active,
                    vec![Effect::DirectTop {
                        column: cantstop_domain::ColumnId::new(column).expect("valid column"),
                    }],
                    now(),
                )
                .expect("topped");
        }
        router
            .apply(
                &mut active,
                vec![Effect::FixNextRoll {
                    faces: vec![1, 1, 1, 1, 1, 2],
                }],
                now(),
            )
            .expect("armed");

        let mut mocks = PortMocks::new();
        mocks.serve(&active);
        mocks
            .players
            .expect_save()
            .withf(|_, state| state.round.phase() == RoundPhase::Idle)
            .returning(|_, _| Ok(1));
        let (players, router) = mocks.build();

        let use_case = RollDice::new(players, router, Arc::new(ScriptedRandom::new([])), clock());
        let result = use_case.execute(active.id(), None).await.expect("rolled");

        assert!(result.roll.is_none());
        assert!(result.messages.iter().any(|m| m.contains("The round fails")));
    }
}
