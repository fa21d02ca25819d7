//! Record move use case.
//!
//! Advances the markers for the chosen values, then sets off whatever sits on
//! each cell a marker stopped on. The first player to reach a cell gets the
//! full content; the board records who that was, and forgets it again if the
//! move is not saved.

use std::sync::Arc;

use cantstop_domain::{CellPosition, EffectSummary, PlayerId};
use chrono::{DateTime, Utc};

use crate::entities::{Players, Session};
use crate::infrastructure::ports::{
    BoardRepo, ClockPort, ContentCatalog, PlayerSnapshot, TriggerContext,
};
use crate::use_cases::effects::{pending_line, EffectRouter};
use crate::use_cases::error::GameError;

use super::machine;

pub struct RecordMove {
    players: Arc<Players>,
    router: Arc<EffectRouter>,
    catalog: Arc<dyn ContentCatalog>,
    records: Arc<dyn BoardRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RecordMove {
    pub fn new(
        players: Arc<Players>,
        router: Arc<EffectRouter>,
        catalog: Arc<dyn ContentCatalog>,
        records: Arc<dyn BoardRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            router,
            catalog,
            records,
            clock,
        }
    }

    /// Move along one or two values of the last roll.
    ///
    /// # Arguments
    /// * `player_id` - The moving player
    /// * `values` - One value from a playable pair, or a whole pair
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Where the markers went and what the cells did
    /// * `Err(GameError)` - Nothing was changed
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        values: &[u8],
    ) -> Result<Vec<String>, GameError> {
        let now = self.clock.now();
        let mut session = self.players.load(player_id).await?;
        let loaded = session.state.version;

        let mut claimed = Vec::new();
        let result = self.settle(&mut session, values, &mut claimed, now).await;
        // An unsaved move must not keep the cells it claimed.
        if result.is_err() && session.state.version == loaded {
            for at in claimed {
                if let Err(e) = self.records.release_first_trigger(at, player_id).await {
                    tracing::warn!(
                        player_id = %player_id,
                        column = %at.column,
                        position = at.position,
                        error = %e,
                        "First trigger not released"
                    );
                }
            }
        }
        result
    }

    async fn settle(
        &self,
        session: &mut Session,
        values: &[u8],
        claimed: &mut Vec<CellPosition>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, GameError> {
        let player_id = session.id().clone();
        let outcome = machine(&self.router).record_move(&mut session.state, values)?;

        let mut messages = Vec::new();
        let mut summary = EffectSummary::default();
        for arrival in &outcome.arrivals {
            messages.push(format!(
                "Column {}: marker now at {}",
                arrival.at.column, arrival.at.position
            ));
            let Some(cell) = arrival.cell else {
                continue;
            };

            let is_first = self.records.record_first_trigger(arrival.at, &player_id).await?;
            if is_first {
                claimed.push(arrival.at);
            }
            let ctx = TriggerContext {
                player: PlayerSnapshot::capture(
                    &session.player,
                    &session.state,
                    &session.inventory,
                ),
                at: arrival.at,
                content: cell.content,
                is_first,
            };
            let (message, effects) = self.catalog.trigger(&ctx)?.into_parts();

            tracing::info!(
                player_id = %player_id,
                column = %arrival.at.column,
                position = arrival.at.position,
                content = %cell.content,
                is_first,
                effects = effects.len(),
                "Content triggered"
            );

            if !message.is_empty() {
                messages.push(message);
            }
            summary.merge(self.router.apply(session, effects, now)?);
        }

        for column in &outcome.at_top {
            messages.push(format!(
                "Column {column} reached the top. End the round to claim it"
            ));
        }

        messages.extend(self.router.commit(session, summary, now).await?);
        messages.extend(pending_line(session));
        Ok(messages)
    }
}
