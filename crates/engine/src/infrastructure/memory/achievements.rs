use async_trait::async_trait;
use cantstop_domain::{AchievementBook, AchievementId, PlayerId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::infrastructure::ports::{AchievementRepo, RepoError};

#[derive(Default)]
pub struct InMemoryAchievementRepo {
    books: DashMap<PlayerId, AchievementBook>,
}

impl InMemoryAchievementRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AchievementRepo for InMemoryAchievementRepo {
    async fn list(&self, player: &PlayerId) -> Result<AchievementBook, RepoError> {
        Ok(self
            .books
            .get(player)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn grant(
        &self,
        player: &PlayerId,
        id: &AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        Ok(self
            .books
            .entry(player.clone())
            .or_default()
            .grant(id.clone(), at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grant_is_idempotent() {
        let repo = InMemoryAchievementRepo::new();
        let player = PlayerId::new("p1").expect("valid id");
        let now = Utc::now();

        assert!(repo.grant(&player, &AchievementId::all_sixes(), now).await.expect("grant"));
        assert!(!repo.grant(&player, &AchievementId::all_sixes(), now).await.expect("grant"));

        let book = repo.list(&player).await.expect("list");
        assert_eq!(book.len(), 1);
        assert!(book.has(&AchievementId::all_sixes()));
    }
}
