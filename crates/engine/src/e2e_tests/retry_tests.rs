//! Commands that lose a race on the player's own record and run again.
//!
//! `JostlingBoard` writes to the claimant's record once, right as the first
//! board-wide claim is made, so the save that follows is stale and the
//! dispatcher has to retry the whole command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cantstop_domain::{CellPosition, ColumnId, PlayerId};
use cantstop_shared::{BoardView, CommandIntent, InventoryView, ProgressView, QueryKind};

use super::{mentions, TestGame};
use crate::app::Repositories;
use crate::infrastructure::memory::{InMemoryBoardRepo, InMemoryPlayerRepo};
use crate::infrastructure::ports::{BoardRepo, PlayerRepo, RepoError};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Jostle {
    FirstTrigger,
    FirstClear,
}

struct JostlingBoard {
    inner: Arc<InMemoryBoardRepo>,
    players: Arc<InMemoryPlayerRepo>,
    on: Jostle,
    done: AtomicBool,
}

impl JostlingBoard {
    /// Save the claimant's stored record unchanged, bumping its version.
    async fn jostle(&self, when: Jostle, player: &PlayerId) -> Result<(), RepoError> {
        if when != self.on || self.done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let profile = self
            .players
            .get(player)
            .await?
            .ok_or_else(|| RepoError::not_found("Player", player))?;
        let state = self.players.load_state(player).await?;
        self.players.save(&profile, &state).await?;
        Ok(())
    }
}

#[async_trait]
impl BoardRepo for JostlingBoard {
    async fn record_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<bool, RepoError> {
        let claimed = self.inner.record_first_trigger(at, player).await?;
        self.jostle(Jostle::FirstTrigger, player).await?;
        Ok(claimed)
    }

    async fn release_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<(), RepoError> {
        self.inner.release_first_trigger(at, player).await
    }

    async fn record_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<bool, RepoError> {
        let claimed = self.inner.record_first_clear(column, player).await?;
        self.jostle(Jostle::FirstClear, player).await?;
        Ok(claimed)
    }

    async fn release_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<(), RepoError> {
        self.inner.release_first_clear(column, player).await
    }

    async fn record_win(&self, player: &PlayerId) -> Result<u32, RepoError> {
        self.inner.record_win(player).await
    }

    async fn first_clears(&self) -> Result<Vec<(ColumnId, PlayerId)>, RepoError> {
        self.inner.first_clears().await
    }

    async fn ranking(&self) -> Result<Vec<PlayerId>, RepoError> {
        self.inner.ranking().await
    }
}

fn jostled_game(on: Jostle) -> TestGame {
    TestGame::wired(|repos| {
        let board: Arc<dyn BoardRepo> = Arc::new(JostlingBoard {
            inner: repos.board.clone(),
            players: repos.players.clone(),
            on,
            done: AtomicBool::new(false),
        });
        let mut wired = Repositories::from(repos);
        wired.board = board;
        wired
    })
}

#[tokio::test]
async fn a_retried_pickup_still_finds_the_item() {
    let game = jostled_game(Jostle::FirstTrigger);
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;

    game.roll("mira", [6, 6, 6, 6, 6, 6]).await;
    let moved = game.record("mira", &[18, 18]).await;

    assert!(mentions(&moved, "You found Bonfire"));
    assert!(!mentions(&moved, "already picked up"));
    let inventory: InventoryView = game.query("mira", QueryKind::Inventory).await;
    assert!(inventory.items.iter().any(|item| item.name == "Bonfire"));
}

#[tokio::test]
async fn a_retried_top_out_pays_the_first_clear_bonus() {
    let game = jostled_game(Jostle::FirstClear);
    game.join("mira", "adopter").await;
    game.ok("mira", CommandIntent::StartRound).await;
    game.roll("mira", [6, 6, 6, 6, 6, 6]).await;
    game.record("mira", &[18, 18]).await;
    game.roll("mira", [6, 6, 6, 6, 6, 6]).await;
    game.record("mira", &[18]).await;

    let before: ProgressView = game.query("mira", QueryKind::Progress).await;
    let ended = game.ok("mira", CommandIntent::EndRoundActive).await;

    assert!(mentions(&ended, "First to top column 18! +20"));
    let after: ProgressView = game.query("mira", QueryKind::Progress).await;
    assert_eq!(after.current_score, before.current_score + 10 + 20);

    let board: BoardView = game.query("mira", QueryKind::Board).await;
    let top = board
        .columns
        .iter()
        .find(|column| column.column == 18)
        .expect("column 18");
    assert_eq!(top.first_clear.as_deref(), Some("mira"));
}
