//! Resolve choice use case.

use std::sync::Arc;

use cantstop_domain::PlayerId;

use crate::entities::Players;
use crate::infrastructure::ports::{ChoiceContext, ClockPort, ContentCatalog, PlayerSnapshot};
use crate::use_cases::effects::{pending_line, EffectRouter};
use crate::use_cases::error::GameError;

use super::machine;

pub struct ResolveChoice {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl ResolveChoice {
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

    /// Answer the oldest pending choice.
    ///
    /// A follow-up choice raised by the answer is asked next, ahead of
    /// anything queued earlier.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - What the answer led to
    /// * `Err(GameError)` - No choice pending or the answer does not fit; the queue is unchanged
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        answer: &str,
    ) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let mut session = self.players.load(player_id).await?;

        let (choice, resolved) = machine(&self.router).resolve_choice(&mut session.state, answer)?;
        let ctx = ChoiceContext {
            player: PlayerSnapshot::capture(&session.player, &session.state, &session.inventory),
            choice,
            answer: resolved,
        };
        let (message, effects) = self.catalog.resolve_choice(&ctx)?.into_parts();

        tracing::info!(
            player_id = %player_id,
            source = %ctx.choice.source(),
            answer = %ctx.answer.label,
            effects = effects.len(),
            "Choice resolved"
        );

        let summary = self.router.apply_follow_up(&mut session, effects, now)?;
        let mut messages = Vec::new();
        if !message.is_empty() {
            messages.push(message);
        }
        messages.extend(self.router.commit(&mut session, summary, now).await?);
        messages.extend(pending_line(&session));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{ContentOutcome, MockContentCatalog};
    use crate::test_fixtures::{active_session, clock, now, PortMocks};
    use cantstop_domain::{
        ChoiceSpec, ContentRef, DomainError, Effect, EncounterId, PendingChoice,
    };

    fn choice(id: u16, prompt: &str) -> PendingChoice {
        PendingChoice::new(
            ContentRef::Encounter(EncounterId::new(id)),
            prompt,
            ChoiceSpec::Options(vec!["Yes".into(), "No".into()]),
        )
    }

    fn awaiting() -> crate::entities::Session {
        let mut session = active_session("a");
        let (_, router) = PortMocks::new().build();
        router
            .apply(
                &mut session,
                vec![
                    Effect::RequireChoice {
                        choice: choice(1, "First?"),
                    },
                    Effect::RequireChoice {
                        choice: choice(2, "Second?"),
                    },
                ],
                now(),
            )
            .expect("queued");
        session
    }

    #[tokio::test]
    async fn when_answer_does_not_fit_queue_is_untouched() {
        let session = awaiting();
        let mut mocks = PortMocks::new();
        mocks.serve(&session);
        let (players, router) = mocks.build();

        let use_case =
            ResolveChoice::new(players, router, Arc::new(MockContentCatalog::new()), clock());
        let result = use_case.execute(session.id(), "Maybe").await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn follow_up_is_asked_before_older_choices() {
        let session = awaiting();
        let mut catalog = MockContentCatalog::new();
        catalog
            .expect_resolve_choice()
            .withf(|ctx| ctx.answer.label == "Yes" && ctx.choice.prompt() == "First?")
            .returning(|_| {
                Ok(ContentOutcome::message("The cat purrs")
                    .with_effect(Effect::ScoreDelta { amount: 5 })
                    .with_choice(choice(3, "Again?")))
            });

        let mut mocks = PortMocks::new();
        mocks.serve(&session);
        mocks
            .players
            .expect_save()
            .withf(|player, state| {
                let prompts: Vec<&str> =
                    state.round.pending().iter().map(|c| c.prompt()).collect();
                player.current_score() == 105 && prompts == ["Again?", "Second?"]
            })
            .times(1)
            .returning(|_, _| Ok(1));
        let (players, router) = mocks.build();

        let use_case = ResolveChoice::new(players, router, Arc::new(catalog), clock());
        let messages = use_case.execute(session.id(), "yes!").await.expect("resolved");

        assert_eq!(messages[0], "The cat purrs");
        assert_eq!(messages[1], "Score +5");
        assert_eq!(
            messages.last().map(String::as_str),
            Some("Choice: Again? [Yes / No]")
        );
    }
}
