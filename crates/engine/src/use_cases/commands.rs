//! Command dispatch.
//!
//! Turns one `CommandEnvelope` into one `CommandReply`. Errors never escape:
//! they are classified and returned as a rejection. A command that lost a
//! version race is run again from scratch, up to the configured retry count.

use std::sync::Arc;

use cantstop_domain::{ColumnId, PlayerId};
use cantstop_shared::{
    CommandEnvelope, CommandIntent, CommandReply, ErrorKind, ItemArgs, QueryKind,
};
use tracing::instrument;

use crate::entities::Players;
use crate::infrastructure::ports::ItemUseArgs;
use crate::use_cases::error::GameError;
use crate::use_cases::items::ItemUseCases;
use crate::use_cases::player::PlayerUseCases;
use crate::use_cases::queries::Queries;
use crate::use_cases::round::{EndMode, RoundUseCases};

pub struct CommandDispatcher {
    players: Arc<Players>,
    player: PlayerUseCases,
    round: RoundUseCases,
    items: ItemUseCases,
    queries: Arc<Queries>,
    retries: u32,
}

impl CommandDispatcher {
    pub fn new(
        players: Arc<Players>,
        player: PlayerUseCases,
        round: RoundUseCases,
        items: ItemUseCases,
        queries: Arc<Queries>,
        retries: u32,
    ) -> Self {
        Self {
            players,
            player,
            round,
            items,
            queries,
            retries,
        }
    }

    /// Run one command and describe the result.
    ///
    /// # Returns
    /// `CommandReply::Ok` with narration (and a view for queries and rolls),
    /// or `CommandReply::Rejected` with the error class and a readable reason.
    #[instrument(skip(self, envelope), fields(player_id = %envelope.player_id, command = envelope.command.name()))]
    pub async fn dispatch(&self, envelope: &CommandEnvelope) -> CommandReply {
        let mut attempt = 0;
        loop {
            match self.run(envelope).await {
                Ok(reply) => return reply,
                Err(e) if e.is_conflict() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "Stale write, running the command again");
                }
                Err(e) => {
                    let kind = e.kind();
                    if kind == ErrorKind::Internal {
                        tracing::error!(error = %e, "Command failed");
                    } else {
                        tracing::debug!(error = %e, kind = ?kind, "Command rejected");
                    }
                    return CommandReply::rejected(kind, e.player_message());
                }
            }
        }
    }

    async fn run(&self, envelope: &CommandEnvelope) -> Result<CommandReply, GameError> {
        let player_id = PlayerId::new(envelope.player_id.as_str())?;

        if let CommandIntent::Register { nickname } = &envelope.command {
            let (player, created) = self.player.register.execute(&player_id, nickname).await?;
            let message = if created {
                format!("Welcome, {}! Choose a faction to begin", player.nickname())
            } else {
                format!("{} is already registered", player.nickname())
            };
            return Ok(CommandReply::ok(vec![message]));
        }
        if let CommandIntent::Query {
            query: QueryKind::Board,
        } = &envelope.command
        {
            let view = self.queries.board().await?;
            return Ok(CommandReply::ok_with(Vec::new(), &view));
        }

        match &envelope.nickname {
            Some(nickname) => {
                self.player.register.execute(&player_id, nickname).await?;
            }
            None => {
                if self.players.get(&player_id).await?.is_none() {
                    return Err(GameError::UnknownPlayer(player_id.to_string()));
                }
            }
        }

        let messages = match &envelope.command {
            CommandIntent::ChooseFaction { faction } => {
                self.player.choose_faction.execute(&player_id, faction).await?
            }
            CommandIntent::LinkPartner { partner } => {
                self.player.link_partner.execute(&player_id, partner).await?
            }
            CommandIntent::ClaimReward {
                kind,
                count,
                multiplier,
            } => {
                self.player
                    .claim_reward
                    .execute(&player_id, *kind, *count, *multiplier)
                    .await?
            }
            CommandIntent::StartRound => self.round.start.execute(&player_id).await?,
            CommandIntent::Roll { count } => {
                let result = self.round.roll.execute(&player_id, *count).await?;
                return Ok(match result.roll {
                    Some(roll) => CommandReply::ok_with(result.messages, &roll),
                    None => CommandReply::ok(result.messages),
                });
            }
            CommandIntent::RecordMove { values } => {
                self.round.record_move.execute(&player_id, values).await?
            }
            CommandIntent::EndRoundActive => {
                self.round.end.execute(&player_id, EndMode::Active).await?
            }
            CommandIntent::EndRoundPassive => {
                self.round.end.execute(&player_id, EndMode::Passive).await?
            }
            CommandIntent::CheckIn => self.round.check_in.execute(&player_id).await?,
            CommandIntent::ResolveChoice { answer } => {
                self.round.resolve_choice.execute(&player_id, answer).await?
            }
            CommandIntent::BuyItem { name } => self.items.buy.execute(&player_id, name).await?,
            CommandIntent::UseItem { name, args } => {
                let args = item_use_args(args)?;
                self.items.use_item.execute(&player_id, name, args).await?
            }
            CommandIntent::Query { query } => return self.query(&player_id, *query).await,
            CommandIntent::Register { .. } | CommandIntent::Unknown => {
                return Err(GameError::Unsupported(envelope.command.name().to_string()))
            }
        };
        Ok(CommandReply::ok(messages))
    }

    async fn query(&self, player_id: &PlayerId, query: QueryKind) -> Result<CommandReply, GameError> {
        let reply = match query {
            QueryKind::Progress => {
                CommandReply::ok_with(Vec::new(), &self.queries.progress(player_id).await?)
            }
            QueryKind::Inventory => {
                CommandReply::ok_with(Vec::new(), &self.queries.inventory(player_id).await?)
            }
            QueryKind::Achievements => {
                CommandReply::ok_with(Vec::new(), &self.queries.achievements(player_id).await?)
            }
            QueryKind::Shop => {
                CommandReply::ok_with(Vec::new(), &self.queries.shop(player_id).await?)
            }
            QueryKind::Board => CommandReply::ok_with(Vec::new(), &self.queries.board().await?),
        };
        Ok(reply)
    }
}

/// Validate raw item arguments into domain ids.
fn item_use_args(args: &ItemArgs) -> Result<ItemUseArgs, GameError> {
    Ok(ItemUseArgs {
        target: args.target.as_deref().map(PlayerId::new).transpose()?,
        column: args.column.map(ColumnId::new).transpose()?,
        to_column: args.to_column.map(ColumnId::new).transpose()?,
        position: args.position,
        faces: args.faces.clone(),
        choice: args.choice.clone(),
    })
}
