//! Player entity operations.

use std::sync::Arc;

use cantstop_domain::{CellPosition, ColumnId, Inventory, Player, PlayerGameState, PlayerId};

use crate::infrastructure::ports::{InventoryRepo, PlayerRepo, RepoError};

/// Everything a command needs to know about one player, loaded together.
#[derive(Debug, Clone)]
pub struct Session {
    pub player: Player,
    pub state: PlayerGameState,
    pub inventory: Inventory,
}

impl Session {
    pub fn id(&self) -> &PlayerId {
        self.player.id()
    }
}

/// Player entity operations.
///
/// Loads a player's profile, game state and inventory as one `Session` and
/// writes profile and state back through the version-checked save.
pub struct Players {
    repo: Arc<dyn PlayerRepo>,
    inventory: Arc<dyn InventoryRepo>,
}

impl Players {
    pub fn new(repo: Arc<dyn PlayerRepo>, inventory: Arc<dyn InventoryRepo>) -> Self {
        Self { repo, inventory }
    }

    pub async fn get(&self, id: &PlayerId) -> Result<Option<Player>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Player>, RepoError> {
        self.repo.list().await
    }

    pub async fn insert_if_absent(&self, player: &Player) -> Result<(Player, bool), RepoError> {
        self.repo.insert_if_absent(player).await
    }

    /// Load profile, state and inventory. Unknown players are `NotFound`.
    pub async fn load(&self, id: &PlayerId) -> Result<Session, RepoError> {
        let player = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Player", id))?;
        let state = self.repo.load_state(id).await?;
        let inventory = self.inventory.get(id).await?;
        Ok(Session {
            player,
            state,
            inventory,
        })
    }

    /// Version-checked write of profile and state. On success the session
    /// carries the new version so it can be saved again.
    pub async fn save(&self, session: &mut Session) -> Result<u64, RepoError> {
        let version = self.repo.save(&session.player, &session.state).await?;
        session.state.version = version;
        Ok(version)
    }

    pub async fn load_state(&self, id: &PlayerId) -> Result<PlayerGameState, RepoError> {
        self.repo.load_state(id).await
    }

    /// Save a session that just topped `topped`, knocking every other
    /// player's temporary marker off those columns in the same write.
    /// Returns who fell off each column.
    pub async fn save_topping(
        &self,
        session: &mut Session,
        topped: &[ColumnId],
    ) -> Result<Vec<(ColumnId, Vec<PlayerId>)>, RepoError> {
        if topped.is_empty() {
            self.save(session).await?;
            return Ok(Vec::new());
        }
        let saved = self
            .repo
            .save_with_cascade(&session.player, &session.state, topped)
            .await?;
        session.state.version = saved.version;
        Ok(saved.knocked)
    }

    pub async fn with_marker_at(&self, at: CellPosition) -> Result<Vec<PlayerId>, RepoError> {
        self.repo.players_with_marker_at(at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockInventoryRepo, MockPlayerRepo};
    use chrono::Utc;

    fn player_id() -> PlayerId {
        PlayerId::new("p1").expect("valid id")
    }

    #[tokio::test]
    async fn when_player_missing_load_is_not_found() {
        let mut repo = MockPlayerRepo::new();
        repo.expect_get().returning(|_| Ok(None));

        let players = Players::new(Arc::new(repo), Arc::new(MockInventoryRepo::new()));
        let result = players.load(&player_id()).await;

        assert!(matches!(result, Err(RepoError::NotFound { .. })));
    }

    #[tokio::test]
    async fn save_advances_the_session_version() {
        let id = player_id();
        let player = Player::new(id.clone(), "Mira", Utc::now()).expect("valid player");

        let mut repo = MockPlayerRepo::new();
        let stored = player.clone();
        repo.expect_get()
            .returning(move |_| Ok(Some(stored.clone())));
        let state_id = id.clone();
        repo.expect_load_state()
            .returning(move |_| Ok(PlayerGameState::new(state_id.clone())));
        repo.expect_save()
            .withf(|_, state| state.version == 0)
            .returning(|_, _| Ok(1));

        let mut inventory = MockInventoryRepo::new();
        inventory
            .expect_get()
            .returning(|_| Ok(Inventory::new()));

        let players = Players::new(Arc::new(repo), Arc::new(inventory));
        let mut session = players.load(&id).await.expect("loaded");
        assert_eq!(session.id(), &id);

        let version = players.save(&mut session).await.expect("saved");
        assert_eq!(version, 1);
        assert_eq!(session.state.version, 1);
    }
}
