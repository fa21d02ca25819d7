//! Board-wide records: first triggers, first clears and the win ranking.

use async_trait::async_trait;
use cantstop_domain::{CellPosition, ColumnId, PlayerId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{BoardRepo, RepoError};

#[derive(Default)]
pub struct InMemoryBoardRepo {
    triggered: DashMap<CellPosition, PlayerId>,
    cleared: DashMap<ColumnId, PlayerId>,
    ranking: RwLock<Vec<PlayerId>>,
}

impl InMemoryBoardRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardRepo for InMemoryBoardRepo {
    async fn record_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<bool, RepoError> {
        match self.triggered.entry(at) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(player.clone());
                Ok(true)
            }
        }
    }

    async fn release_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<(), RepoError> {
        self.triggered.remove_if(&at, |_, holder| holder == player);
        Ok(())
    }

    async fn record_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<bool, RepoError> {
        match self.cleared.entry(column) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(player.clone());
                Ok(true)
            }
        }
    }

    async fn release_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<(), RepoError> {
        self.cleared.remove_if(&column, |_, holder| holder == player);
        Ok(())
    }

    async fn record_win(&self, player: &PlayerId) -> Result<u32, RepoError> {
        let mut ranking = self.ranking.write().await;
        let index = match ranking.iter().position(|p| p == player) {
            Some(index) => index,
            None => {
                ranking.push(player.clone());
                ranking.len() - 1
            }
        };
        u32::try_from(index + 1).map_err(|e| RepoError::database("record_win", e))
    }

    async fn first_clears(&self) -> Result<Vec<(ColumnId, PlayerId)>, RepoError> {
        let mut clears: Vec<(ColumnId, PlayerId)> = self
            .cleared
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        clears.sort_by_key(|(column, _)| *column);
        Ok(clears)
    }

    async fn ranking(&self) -> Result<Vec<PlayerId>, RepoError> {
        Ok(self.ranking.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(raw: &str) -> PlayerId {
        PlayerId::new(raw).expect("valid id")
    }

    #[tokio::test]
    async fn only_one_first_trigger_per_cell_under_contention() {
        let repo = Arc::new(InMemoryBoardRepo::new());
        let cell = CellPosition::new(ColumnId::new(7).expect("valid column"), 2);

        let mut handles = Vec::new();
        for n in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.record_first_trigger(cell, &id(&format!("p{n}")))
                    .await
                    .expect("record")
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.expect("task") {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn ranking_is_stable_for_repeat_winners() {
        let repo = InMemoryBoardRepo::new();
        assert_eq!(repo.record_win(&id("a")).await.expect("win"), 1);
        assert_eq!(repo.record_win(&id("b")).await.expect("win"), 2);
        assert_eq!(repo.record_win(&id("a")).await.expect("win"), 1);
        assert_eq!(repo.ranking().await.expect("ranking"), vec![id("a"), id("b")]);
    }

    #[tokio::test]
    async fn first_clears_are_sorted_by_column() {
        let repo = InMemoryBoardRepo::new();
        let high = ColumnId::new(12).expect("valid column");
        let low = ColumnId::new(4).expect("valid column");
        assert!(repo.record_first_clear(high, &id("a")).await.expect("clear"));
        assert!(repo.record_first_clear(low, &id("b")).await.expect("clear"));
        assert!(!repo.record_first_clear(low, &id("a")).await.expect("clear"));

        let clears = repo.first_clears().await.expect("clears");
        assert_eq!(clears, vec![(low, id("b")), (high, id("a"))]);
    }

    #[tokio::test]
    async fn a_released_claim_can_be_taken_again() {
        let repo = InMemoryBoardRepo::new();
        let cell = CellPosition::new(ColumnId::new(5).expect("valid column"), 1);
        assert!(repo.record_first_trigger(cell, &id("a")).await.expect("claim"));

        // Someone else's release leaves the claim in place.
        repo.release_first_trigger(cell, &id("b")).await.expect("release");
        assert!(!repo.record_first_trigger(cell, &id("b")).await.expect("claim"));

        repo.release_first_trigger(cell, &id("a")).await.expect("release");
        assert!(repo.record_first_trigger(cell, &id("b")).await.expect("claim"));

        let column = ColumnId::new(18).expect("valid column");
        assert!(repo.record_first_clear(column, &id("a")).await.expect("clear"));
        repo.release_first_clear(column, &id("a")).await.expect("release");
        assert!(repo.first_clears().await.expect("clears").is_empty());
    }
}
