//! Link partner use case.

use std::sync::Arc;

use cantstop_domain::PlayerId;

use crate::entities::Players;
use crate::use_cases::error::GameError;

pub struct LinkPartner {
    players: Arc<Players>,
}

impl LinkPartner {
    pub fn new(players: Arc<Players>) -> Self {
        Self { players }
    }

    /// Sign a contract with another registered player. Effects aimed at
    /// "your partner" land on them from now on.
    pub async fn execute(
        &self,
        player_id: &PlayerId,
        partner: &str,
    ) -> Result<Vec<String>, GameError> {
        let partner_id = PlayerId::new(partner)?;
        let partner = self
            .players
            .get(&partner_id)
            .await?
            .ok_or_else(|| GameError::UnknownPlayer(partner_id.to_string()))?;

        let mut session = self.players.load(player_id).await?;
        session.player.link_partner(partner_id.clone())?;
        self.players.save(&mut session).await?;

        tracing::info!(player_id = %player_id, partner_id = %partner_id, "Partner linked");
        Ok(vec![format!(
            "{} signs a contract with {}",
            session.player.nickname(),
            partner.nickname()
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{player, session, PortMocks};
    use cantstop_domain::DomainError;

    #[tokio::test]
    async fn when_partner_unknown_returns_error() {
        let mut mocks = PortMocks::new();
        mocks.players.expect_get().returning(|_| Ok(None));
        let (players, _) = mocks.build();

        let result = LinkPartner::new(players)
            .execute(&PlayerId::new("a").expect("valid id"), "ghost")
            .await;

        assert!(matches!(result, Err(GameError::UnknownPlayer(_))));
    }

    #[tokio::test]
    async fn when_linking_to_self_returns_validation_error() {
        let me = session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&me);
        let (players, _) = mocks.build();

        let result = LinkPartner::new(players).execute(me.id(), "a").await;

        assert!(matches!(
            result,
            Err(GameError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn partner_is_saved_on_the_profile() {
        let me = session("a");
        let mut mocks = PortMocks::new();
        mocks.serve(&me);
        let other = player("b");
        mocks
            .players
            .expect_get()
            .withf(|id| id.as_str() == "b")
            .returning(move |_| Ok(Some(other.clone())));
        mocks
            .players
            .expect_save()
            .withf(|player, _| player.partner().map(PlayerId::as_str) == Some("b"))
            .times(1)
            .returning(|_, _| Ok(1));
        let (players, _) = mocks.build();

        let messages = LinkPartner::new(players)
            .execute(me.id(), "b")
            .await
            .expect("linked");
        assert_eq!(messages, vec!["a signs a contract with b".to_string()]);
    }
}
