//! Player profiles and game states behind a single lock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use cantstop_domain::{CellPosition, ColumnId, Player, PlayerGameState, PlayerId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CascadeSave, PlayerRepo, RepoError};

#[derive(Default)]
struct Store {
    players: BTreeMap<PlayerId, Player>,
    states: BTreeMap<PlayerId, PlayerGameState>,
}

impl Store {
    /// Version-checked write of profile and state.
    fn write(&mut self, player: &Player, state: &PlayerGameState) -> Result<u64, RepoError> {
        if player.id() != &state.player_id {
            return Err(RepoError::constraint(format!(
                "state of {} cannot be saved with profile {}",
                state.player_id,
                player.id()
            )));
        }

        let stored = self.states.get(player.id()).map_or(0, |s| s.version);
        if stored != state.version {
            return Err(RepoError::conflict(
                "PlayerGameState",
                player.id(),
                state.version,
                stored,
            ));
        }

        let mut next = state.clone();
        next.version = stored + 1;
        self.players.insert(player.id().clone(), player.clone());
        self.states.insert(player.id().clone(), next);
        Ok(stored + 1)
    }
}

/// Profiles and states share one lock so `save` writes both at once.
#[derive(Default)]
pub struct InMemoryPlayerRepo {
    store: RwLock<Store>,
}

impl InMemoryPlayerRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerRepo for InMemoryPlayerRepo {
    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, RepoError> {
        Ok(self.store.read().await.players.get(id).cloned())
    }

    async fn insert_if_absent(&self, player: &Player) -> Result<(Player, bool), RepoError> {
        let mut store = self.store.write().await;
        if let Some(existing) = store.players.get(player.id()) {
            return Ok((existing.clone(), false));
        }
        store.players.insert(player.id().clone(), player.clone());
        Ok((player.clone(), true))
    }

    async fn list(&self) -> Result<Vec<Player>, RepoError> {
        Ok(self.store.read().await.players.values().cloned().collect())
    }

    async fn load_state(&self, id: &PlayerId) -> Result<PlayerGameState, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .states
            .get(id)
            .cloned()
            .unwrap_or_else(|| PlayerGameState::new(id.clone())))
    }

    async fn save(&self, player: &Player, state: &PlayerGameState) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        store.write(player, state)
    }

    async fn save_with_cascade(
        &self,
        player: &Player,
        state: &PlayerGameState,
        topped: &[ColumnId],
    ) -> Result<CascadeSave, RepoError> {
        let mut store = self.store.write().await;
        let version = store.write(player, state)?;

        let mut knocked = Vec::with_capacity(topped.len());
        for column in topped {
            let mut affected = Vec::new();
            for (id, other) in store.states.iter_mut() {
                if id == player.id() {
                    continue;
                }
                if other.markers.clear_temporary(*column) {
                    other.version += 1;
                    affected.push(id.clone());
                }
            }
            knocked.push((*column, affected));
        }
        Ok(CascadeSave { version, knocked })
    }

    async fn players_with_marker_at(&self, at: CellPosition) -> Result<Vec<PlayerId>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .states
            .iter()
            .filter(|(_, state)| state.markers.temporary(at.column) == Some(at.position))
            .map(|(id, _)| id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantstop_domain::Board;
    use chrono::Utc;

    fn player(id: &str) -> Player {
        Player::new(PlayerId::new(id).expect("valid id"), id, Utc::now()).expect("valid player")
    }

    fn column(raw: u8) -> ColumnId {
        ColumnId::new(raw).expect("valid column")
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_the_first_record() {
        let repo = InMemoryPlayerRepo::new();
        let (_, created) = repo.insert_if_absent(&player("a")).await.expect("insert");
        assert!(created);

        let renamed = Player::new(PlayerId::new("a").expect("valid id"), "other", Utc::now())
            .expect("valid player");
        let (stored, created) = repo.insert_if_absent(&renamed).await.expect("insert");
        assert!(!created);
        assert_eq!(stored.nickname(), "a");
    }

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let repo = InMemoryPlayerRepo::new();
        let p = player("a");
        let state = repo.load_state(p.id()).await.expect("load");
        assert_eq!(state.version, 0);

        assert_eq!(repo.save(&p, &state).await.expect("first save"), 1);
        let result = repo.save(&p, &state).await;
        assert!(matches!(result, Err(RepoError::Conflict { expected: 0, actual: 1, .. })));

        let reloaded = repo.load_state(p.id()).await.expect("load");
        assert_eq!(reloaded.version, 1);
    }

    #[tokio::test]
    async fn cascade_save_spares_the_owner_and_bumps_versions() {
        let repo = InMemoryPlayerRepo::new();
        let board = Board::standard();
        for id in ["a", "b", "c"] {
            let p = player(id);
            let mut state = repo.load_state(p.id()).await.expect("load");
            if id != "c" {
                state.markers.advance(&board, column(7)).expect("advance");
            }
            repo.save(&p, &state).await.expect("save");
        }

        let a = player("a");
        let state = repo.load_state(a.id()).await.expect("load");
        let saved = repo
            .save_with_cascade(&a, &state, &[column(7)])
            .await
            .expect("saved");
        let b = PlayerId::new("b").expect("valid id");
        assert_eq!(saved.version, 2);
        assert_eq!(saved.knocked, vec![(column(7), vec![b.clone()])]);

        let b_state = repo.load_state(&b).await.expect("load");
        assert_eq!(b_state.markers.temporary(column(7)), None);
        assert_eq!(b_state.version, 2);
        let a_state = repo.load_state(a.id()).await.expect("load");
        assert_eq!(a_state.markers.temporary(column(7)), Some(1));
    }

    #[tokio::test]
    async fn stale_cascade_save_knocks_nobody_off() {
        let repo = InMemoryPlayerRepo::new();
        let board = Board::standard();
        let b = player("b");
        let mut b_state = repo.load_state(b.id()).await.expect("load");
        b_state.markers.advance(&board, column(3)).expect("advance");
        repo.save(&b, &b_state).await.expect("save");

        let a = player("a");
        let stale = repo.load_state(a.id()).await.expect("load");
        repo.save(&a, &stale).await.expect("first save");

        let result = repo.save_with_cascade(&a, &stale, &[column(3)]).await;
        assert!(matches!(result, Err(RepoError::Conflict { .. })));
        let b_state = repo.load_state(b.id()).await.expect("load");
        assert_eq!(b_state.markers.temporary(column(3)), Some(1));
        assert_eq!(b_state.version, 1);
    }

    #[tokio::test]
    async fn finds_players_on_a_cell() {
        let repo = InMemoryPlayerRepo::new();
        let board = Board::standard();
        let p = player("a");
        let mut state = repo.load_state(p.id()).await.expect("load");
        state.markers.advance(&board, column(9)).expect("advance");
        repo.save(&p, &state).await.expect("save");

        let found = repo
            .players_with_marker_at(CellPosition::new(column(9), 1))
            .await
            .expect("query");
        assert_eq!(found, vec![p.id().clone()]);
        let none = repo
            .players_with_marker_at(CellPosition::new(column(9), 2))
            .await
            .expect("query");
        assert!(none.is_empty());
    }
}
