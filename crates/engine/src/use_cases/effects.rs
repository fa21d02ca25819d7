//! Effect settlement.
//!
//! The domain applier changes one player's record in memory and reports what
//! reaches further. `EffectRouter` finishes the job. Top-out and win rewards
//! go into the same save as the batch that caused them, and that save also
//! knocks other players off the topped columns. A first clear claimed for a
//! save that fails is released again. Inventory, achievements and shop
//! unlocks follow the save, and cross-player effects run through the applier
//! on each target's own state.

use std::sync::Arc;

use cantstop_domain::{
    AchievementId, Board, CellPosition, ChoiceSpec, ColumnId, Effect, EffectApplier,
    EffectSummary, EffectTarget, PendingChoice, PlayerId,
};
use chrono::{DateTime, Utc};

use crate::entities::{Players, Session};
use crate::infrastructure::ports::{
    AchievementRepo, BoardRepo, InventoryRepo, RandomPort, RepoError, ShopRepo,
};
use crate::infrastructure::settings::GameSettings;

use super::error::GameError;

pub struct EffectRouter {
    board: Arc<Board>,
    players: Arc<Players>,
    inventory: Arc<dyn InventoryRepo>,
    achievements: Arc<dyn AchievementRepo>,
    records: Arc<dyn BoardRepo>,
    shop: Arc<dyn ShopRepo>,
    random: Arc<dyn RandomPort>,
    settings: Arc<GameSettings>,
}

impl EffectRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        board: Arc<Board>,
        players: Arc<Players>,
        inventory: Arc<dyn InventoryRepo>,
        achievements: Arc<dyn AchievementRepo>,
        records: Arc<dyn BoardRepo>,
        shop: Arc<dyn ShopRepo>,
        random: Arc<dyn RandomPort>,
        settings: Arc<GameSettings>,
    ) -> Self {
        Self {
            board,
            players,
            inventory,
            achievements,
            records,
            shop,
            random,
            settings,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Apply a batch to the session in memory.
    pub fn apply(
        &self,
        session: &mut Session,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<EffectSummary, GameError> {
        Ok(EffectApplier::new(&self.board).apply(
            &mut session.player,
            &mut session.state,
            effects,
            now,
        )?)
    }

    /// Like `apply`, but choices raised go to the front of the queue.
    pub fn apply_follow_up(
        &self,
        session: &mut Session,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<EffectSummary, GameError> {
        Ok(EffectApplier::new(&self.board).as_follow_up().apply(
            &mut session.player,
            &mut session.state,
            effects,
            now,
        )?)
    }

    /// Save the session with everything `summary` implies, then route the
    /// cross-player effects. Returns narration lines.
    ///
    /// # Arguments
    /// * `session` - The acting player, already changed in memory
    /// * `summary` - Everything applied to the session since it was loaded
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Lines describing what happened
    /// * `Err(GameError)` - The save was rejected or storage failed
    pub async fn commit(
        &self,
        session: &mut Session,
        summary: EffectSummary,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, GameError> {
        let (mut messages, deferred) = self.persist(session, summary, now).await?;
        for (target, effects) in deferred {
            messages.extend(self.route(session, target, effects, now).await?);
        }
        Ok(messages)
    }

    async fn persist(
        &self,
        session: &mut Session,
        mut summary: EffectSummary,
        now: DateTime<Utc>,
    ) -> Result<(Vec<String>, Vec<(EffectTarget, Vec<Effect>)>), GameError> {
        let mut messages = describe(&summary);
        let id = session.id().clone();

        let mut claimed = Vec::new();
        let saved = self
            .save_with_rewards(session, &mut summary, &mut claimed, now)
            .await;
        let (rewards, knocked) = match saved {
            Ok(saved) => saved,
            Err(e) => {
                self.release_first_clears(&id, &claimed).await;
                return Err(e);
            }
        };
        messages.extend(rewards);

        for (column, players) in knocked {
            if players.is_empty() {
                continue;
            }
            tracing::info!(
                player_id = %id,
                column = %column,
                affected = players.len(),
                "Cleared other players' markers from a topped column"
            );
            messages.push(format!(
                "{} other marker(s) fall off column {column}",
                players.len()
            ));
        }

        for (item, quantity) in &summary.inventory {
            match self.inventory.apply_delta(&id, *item, *quantity).await {
                Ok(_) => {
                    if let Err(e) = session.inventory.apply_delta(*item, *quantity) {
                        tracing::warn!(player_id = %id, item = %item, error = %e, "Inventory copy out of step");
                    }
                }
                Err(RepoError::ConstraintViolation(reason)) => {
                    tracing::warn!(player_id = %id, item = %item, reason = %reason, "Inventory change skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }

        messages.extend(self.grant_achievements(&id, &summary.achievements, now).await?);

        for item in &summary.unlocked_items {
            if self.shop.unlock(*item).await? {
                if let Some(listing) = self.shop.get(*item).await? {
                    messages.push(format!("{} is now on sale in the shop", listing.name));
                }
            }
        }

        Ok((messages, summary.deferred))
    }

    /// Rewards first, then one write carrying the session and the cascade.
    /// First clears claimed on the way are pushed to `claimed`.
    async fn save_with_rewards(
        &self,
        session: &mut Session,
        summary: &mut EffectSummary,
        claimed: &mut Vec<ColumnId>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<String>, Vec<(ColumnId, Vec<PlayerId>)>), GameError> {
        let rewards = self.reward_top_outs(session, summary, claimed, now).await?;
        let knocked = self
            .players
            .save_topping(session, &summary.newly_topped)
            .await?;
        Ok((rewards, knocked))
    }

    async fn release_first_clears(&self, player: &PlayerId, columns: &[ColumnId]) {
        for column in columns {
            match self.records.release_first_clear(*column, player).await {
                Ok(()) => {
                    tracing::debug!(player_id = %player, column = %column, "First clear released")
                }
                Err(e) => {
                    tracing::warn!(player_id = %player, column = %column, error = %e, "First clear not released")
                }
            }
        }
    }

    /// Grant each id once. Returns a line per newly earned achievement.
    pub async fn grant_achievements(
        &self,
        player: &PlayerId,
        ids: &[AchievementId],
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, GameError> {
        let mut messages = Vec::new();
        for id in ids {
            if self.achievements.grant(player, id, now).await? {
                tracing::info!(player_id = %player, achievement = %id, "Achievement earned");
                messages.push(format!("Achievement unlocked: {}", id.title()));
            }
        }
        Ok(messages)
    }

    /// Top-out points, the first-clear bonus, the optional cooldown and the
    /// win ranking, applied before the session is saved.
    async fn reward_top_outs(
        &self,
        session: &mut Session,
        summary: &mut EffectSummary,
        claimed: &mut Vec<ColumnId>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, GameError> {
        let mut messages = Vec::new();
        let mut effects = Vec::new();
        let id = session.id().clone();

        for column in &summary.newly_topped {
            let mut reward = self.settings.top_out_reward;
            messages.push(format!("Column {column} topped! +{}", self.settings.top_out_reward));
            if self.records.record_first_clear(*column, &id).await? {
                claimed.push(*column);
                reward += self.settings.first_clear_bonus;
                messages.push(format!(
                    "First to top column {column}! +{}",
                    self.settings.first_clear_bonus
                ));
                effects.push(Effect::Achievement {
                    id: AchievementId::first_clear(*column),
                });
            }
            if reward > 0 {
                effects.push(Effect::ScoreDelta {
                    amount: i64::from(reward),
                });
            }
            tracing::info!(player_id = %id, column = %column, reward, "Column topped");
        }
        if !summary.newly_topped.is_empty() && self.settings.top_out_cooldown_minutes > 0 {
            effects.push(Effect::LockoutFor {
                minutes: self.settings.top_out_cooldown_minutes,
            });
        }

        let unranked_win = session.state.round.has_won() && session.state.round.rank().is_none();
        if summary.won || unranked_win {
            let rank = self.records.record_win(&id).await?;
            session.state.set_rank(rank);
            let reward = self.settings.rank_reward(rank);
            messages.push(format!(
                "{} has topped three columns and finishes at rank {rank}!",
                session.player.nickname()
            ));
            if reward > 0 {
                effects.push(Effect::ScoreDelta {
                    amount: i64::from(reward),
                });
                messages.push(format!("Rank reward +{reward}"));
            }
            if rank <= self.settings.rewarded_ranks() {
                effects.push(Effect::Achievement {
                    id: AchievementId::rank(rank),
                });
            }
            tracing::info!(player_id = %id, rank, reward, "Player finished the race");
        }

        if !effects.is_empty() {
            let extra = self.apply(session, effects, now)?;
            summary.merge(extra);
        }
        Ok(messages)
    }

    async fn route(
        &self,
        actor: &Session,
        target: EffectTarget,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, GameError> {
        let targets = self.resolve_targets(actor, &target).await?;
        if targets.is_empty() {
            return Ok(vec!["No one else was affected".to_string()]);
        }

        let mut messages = Vec::new();
        for id in targets {
            match self.apply_to(&id, effects.clone(), now).await {
                Ok((nickname, lines)) => {
                    messages.push(format!("{nickname} is affected"));
                    messages.extend(lines);
                }
                Err(GameError::Domain(e)) => {
                    tracing::warn!(target_id = %id, error = %e, "Cross-player effect did not apply");
                    messages.push(format!("It has no effect on {id}"));
                }
                Err(GameError::Repo(RepoError::NotFound { .. })) => {
                    messages.push(format!("There is no player {id}"));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(messages)
    }

    /// Load, apply and save one target, retrying stale writes.
    async fn apply_to(
        &self,
        id: &PlayerId,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<(String, Vec<String>), GameError> {
        let mut attempt = 0;
        loop {
            let mut session = self.players.load(id).await?;
            let summary = self.apply(&mut session, effects.clone(), now)?;
            match self.persist(&mut session, summary, now).await {
                Ok((lines, deferred)) => {
                    if !deferred.is_empty() {
                        tracing::warn!(target_id = %id, "Dropped nested cross-player effects");
                    }
                    return Ok((session.player.nickname().to_string(), lines));
                }
                Err(e) if e.is_conflict() && attempt < self.settings.command_retries => {
                    attempt += 1;
                    tracing::debug!(target_id = %id, attempt, "Retrying cross-player effect");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn resolve_targets(
        &self,
        actor: &Session,
        target: &EffectTarget,
    ) -> Result<Vec<PlayerId>, GameError> {
        let me = actor.id();
        let targets = match target {
            EffectTarget::Partner => actor.player.partner().cloned().into_iter().collect(),
            EffectTarget::Player { id } => vec![id.clone()],
            EffectTarget::MarkersAt { column, position } => self
                .players
                .with_marker_at(CellPosition::new(*column, *position))
                .await?
                .into_iter()
                .filter(|id| id != me)
                .collect(),
            EffectTarget::Opponents => self.others(me).await?,
            EffectTarget::RandomHalf => {
                let mut pool = self.others(me).await?;
                let take = pool.len().div_ceil(2);
                let mut chosen = Vec::with_capacity(take);
                while chosen.len() < take && !pool.is_empty() {
                    let last = i32::try_from(pool.len() - 1).unwrap_or(i32::MAX);
                    let index = usize::try_from(self.random.gen_range(0, last)).unwrap_or(0);
                    chosen.push(pool.swap_remove(index.min(pool.len() - 1)));
                }
                chosen
            }
        };
        Ok(targets)
    }

    async fn others(&self, me: &PlayerId) -> Result<Vec<PlayerId>, GameError> {
        Ok(self
            .players
            .list()
            .await?
            .into_iter()
            .map(|player| player.id().clone())
            .filter(|id| id != me)
            .collect())
    }
}

/// Narration for the parts of a summary the player sees directly.
pub fn describe(summary: &EffectSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(immunity) = summary.immunity_used {
        lines.push(format!("Trap immunity used ({immunity:?})"));
    }
    if summary.score_delta != 0 {
        lines.push(format!("Score {:+}", summary.score_delta));
    }
    for (column, position) in &summary.moves {
        lines.push(marker_line(*column, *position));
    }
    if summary.round_ended {
        lines.push("The round is over".to_string());
    }
    lines.extend(summary.notes.iter().cloned());
    lines
}

/// One line presenting a choice and how to answer it.
pub fn choice_line(choice: &PendingChoice) -> String {
    match choice.spec() {
        ChoiceSpec::Options(options) => {
            format!("{} [{}]", choice.prompt(), options.join(" / "))
        }
        ChoiceSpec::Freeform => format!("{} (answer freely)", choice.prompt()),
    }
}

/// The head of the queue, if this batch left something to answer.
pub fn pending_line(session: &Session) -> Option<String> {
    session
        .state
        .round
        .pending()
        .head()
        .map(|choice| format!("Choice: {}", choice_line(choice)))
}

fn marker_line(column: ColumnId, position: Option<u8>) -> String {
    match position {
        Some(position) => format!("Column {column}: marker now at {position}"),
        None => format!("Column {column}: marker removed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::CascadeSave;
    use crate::test_fixtures::{column, player_id, session, PortMocks};

    #[tokio::test]
    async fn when_save_conflicts_nothing_else_is_persisted() {
        let mut mocks = PortMocks::new();
        mocks
            .players
            .expect_save()
            .returning(|_, _| Err(RepoError::conflict("PlayerGameState", "a", 0, 1)));
        // No expectations on inventory or achievements: any call would panic.
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = router
            .apply(
                &mut actor,
                vec![
                    Effect::ScoreDelta { amount: 5 },
                    Effect::Achievement {
                        id: AchievementId::all_ones(),
                    },
                ],
                Utc::now(),
            )
            .expect("applies");

        let result = router.commit(&mut actor, summary, Utc::now()).await;
        assert!(matches!(result, Err(ref e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn first_top_out_pays_the_bonus_and_clears_others() {
        let mut mocks = PortMocks::new();
        mocks
            .records
            .expect_record_first_clear()
            .withf(|col, _| col.get() == 3)
            .returning(|_, _| Ok(true));
        mocks
            .players
            .expect_save_with_cascade()
            .withf(|player, _, topped| {
                player.id().as_str() == "a" && topped.to_vec() == vec![column(3)]
            })
            .times(1)
            .returning(|_, state, _| {
                Ok(CascadeSave {
                    version: state.version + 1,
                    knocked: vec![(column(3), vec![player_id("b")])],
                })
            });
        mocks
            .achievements
            .expect_grant()
            .withf(|_, id, _| *id == AchievementId::first_clear(ColumnId::new(3).expect("valid")))
            .returning(|_, _, _| Ok(true));
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = EffectSummary {
            newly_topped: vec![column(3)],
            ..EffectSummary::default()
        };

        let messages = router
            .commit(&mut actor, summary, Utc::now())
            .await
            .expect("committed");

        assert_eq!(actor.player.current_score(), 100 + 10 + 20);
        assert_eq!(actor.state.version, 1);
        assert!(messages.iter().any(|m| m.contains("First to top column 3")));
        assert!(messages.iter().any(|m| m.contains("fall off column 3")));
    }

    #[tokio::test]
    async fn a_stale_top_out_gives_the_first_clear_back() {
        let mut mocks = PortMocks::new();
        mocks
            .records
            .expect_record_first_clear()
            .times(1)
            .returning(|_, _| Ok(true));
        mocks
            .records
            .expect_release_first_clear()
            .withf(|col, player| col.get() == 3 && player.as_str() == "a")
            .times(1)
            .returning(|_, _| Ok(()));
        mocks
            .players
            .expect_save_with_cascade()
            .returning(|_, _, _| Err(RepoError::conflict("PlayerGameState", "a", 0, 1)));
        // No grant expectations: nothing after the save may run.
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = EffectSummary {
            newly_topped: vec![column(3)],
            ..EffectSummary::default()
        };
        let result = router.commit(&mut actor, summary, Utc::now()).await;

        assert!(matches!(result, Err(ref e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn cooldown_locks_the_player_out_after_a_top_out() {
        let mut mocks = PortMocks::new();
        mocks.settings.top_out_cooldown_minutes = 30;
        mocks
            .records
            .expect_record_first_clear()
            .returning(|_, _| Ok(false));
        mocks
            .players
            .expect_save_with_cascade()
            .returning(|_, state, topped| {
                Ok(CascadeSave {
                    version: state.version + 1,
                    knocked: topped.iter().map(|col| (*col, Vec::new())).collect(),
                })
            });
        let (_, router) = mocks.build();

        let now = Utc::now();
        let mut actor = session("a");
        let summary = EffectSummary {
            newly_topped: vec![column(18)],
            ..EffectSummary::default()
        };
        router
            .commit(&mut actor, summary, now)
            .await
            .expect("committed");

        assert!(actor.state.round.is_locked_out(now));
        assert_eq!(actor.player.current_score(), 110);
    }

    #[tokio::test]
    async fn a_win_is_ranked_and_rewarded_once() {
        let mut mocks = PortMocks::new();
        mocks
            .records
            .expect_record_win()
            .times(1)
            .returning(|_| Ok(2));
        mocks.accept_saves();
        mocks
            .achievements
            .expect_grant()
            .withf(|_, id, _| *id == AchievementId::rank(2))
            .returning(|_, _, _| Ok(true));
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = EffectSummary {
            won: true,
            ..EffectSummary::default()
        };
        let messages = router
            .commit(&mut actor, summary, Utc::now())
            .await
            .expect("committed");

        assert_eq!(actor.state.round.rank(), Some(2));
        assert_eq!(actor.player.current_score(), 100 + 80);
        assert!(messages.iter().any(|m| m.contains("rank 2")));
    }

    #[tokio::test]
    async fn a_stale_win_is_rewarded_again_on_retry() {
        let mut mocks = PortMocks::new();
        mocks
            .records
            .expect_record_win()
            .times(2)
            .returning(|_| Ok(1));
        let mut saves = 0;
        mocks.players.expect_save().times(2).returning(move |_, state| {
            saves += 1;
            if saves == 1 {
                return Err(RepoError::conflict("PlayerGameState", "a", 0, 1));
            }
            Ok(state.version + 1)
        });
        mocks
            .achievements
            .expect_grant()
            .withf(|_, id, _| *id == AchievementId::rank(1))
            .times(1)
            .returning(|_, _, _| Ok(true));
        let (_, router) = mocks.build();

        let won = || EffectSummary {
            won: true,
            ..EffectSummary::default()
        };
        let mut stale = session("a");
        let result = router.commit(&mut stale, won(), Utc::now()).await;
        assert!(matches!(result, Err(ref e) if e.is_conflict()));

        let mut fresh = session("a");
        router
            .commit(&mut fresh, won(), Utc::now())
            .await
            .expect("committed");
        assert_eq!(fresh.state.round.rank(), Some(1));
        assert_eq!(fresh.player.current_score(), 100 + 100);
    }

    #[tokio::test]
    async fn partner_effects_land_on_the_partner() {
        let mut mocks = PortMocks::new();
        let partner = session("b");
        mocks.serve(&partner);
        mocks.accept_saves();
        let (_, router) = mocks.build();

        let mut actor = session("a");
        actor.player = actor.player.clone().with_partner(player_id("b"));
        let summary = router
            .apply(
                &mut actor,
                vec![Effect::ForPlayer {
                    target: EffectTarget::Partner,
                    effects: vec![Effect::SkipRounds { count: 1 }],
                }],
                Utc::now(),
            )
            .expect("applies");
        assert_eq!(summary.deferred.len(), 1);

        let messages = router
            .commit(&mut actor, summary, Utc::now())
            .await
            .expect("committed");
        assert!(messages.iter().any(|m| m == "b is affected"));
    }

    #[tokio::test]
    async fn stale_target_writes_are_retried() {
        let mut mocks = PortMocks::new();
        let target = session("b");
        mocks.serve(&target);
        let mut calls = 0;
        mocks.players.expect_save().returning(move |player, state| {
            if player.id().as_str() == "b" {
                calls += 1;
                if calls == 1 {
                    return Err(RepoError::conflict("PlayerGameState", "b", 0, 1));
                }
            }
            Ok(state.version + 1)
        });
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = EffectSummary {
            deferred: vec![(
                EffectTarget::Player { id: player_id("b") },
                vec![Effect::ScoreDelta { amount: -5 }],
            )],
            ..EffectSummary::default()
        };
        let messages = router
            .commit(&mut actor, summary, Utc::now())
            .await
            .expect("committed");
        assert!(messages.iter().any(|m| m == "b is affected"));
    }

    #[tokio::test]
    async fn without_a_partner_nobody_is_affected() {
        let mut mocks = PortMocks::new();
        mocks.accept_saves();
        let (_, router) = mocks.build();

        let mut actor = session("a");
        let summary = EffectSummary {
            deferred: vec![(EffectTarget::Partner, vec![Effect::ScoreDelta { amount: 5 }])],
            ..EffectSummary::default()
        };
        let messages = router
            .commit(&mut actor, summary, Utc::now())
            .await
            .expect("committed");
        assert!(messages.iter().any(|m| m == "No one else was affected"));
    }

    #[test]
    fn describe_reports_moves_and_round_end() {
        let summary = EffectSummary {
            score_delta: -10,
            moves: vec![(column(7), Some(2)), (column(9), None)],
            round_ended: true,
            ..EffectSummary::default()
        };
        assert_eq!(
            describe(&summary),
            vec![
                "Score -10".to_string(),
                "Column 7: marker now at 2".to_string(),
                "Column 9: marker removed".to_string(),
                "The round is over".to_string(),
            ]
        );
    }
}
