//! Player aggregate
//!
//! Created on first contact. Score is only changed through the methods here,
//! which the effect applier, roll charges, shop purchases and reward claims
//! call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::PlayerId;
use crate::value_objects::Faction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    nickname: String,
    faction: Option<Faction>,
    current_score: i64,
    /// Lifetime sum of positive gains.
    total_score: i64,
    partner: Option<PlayerId>,
    created_at: DateTime<Utc>,
}

impl Player {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(
        id: PlayerId,
        nickname: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let nickname = nickname.into().trim().to_string();
        if nickname.is_empty() {
            return Err(DomainError::validation("nickname cannot be empty"));
        }
        Ok(Self {
            id,
            nickname,
            faction: None,
            current_score: 0,
            total_score: 0,
            partner: None,
            created_at: now,
        })
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.current_score = score;
        self.total_score = self.total_score.max(score);
        self
    }

    pub fn with_partner(mut self, partner: PlayerId) -> Self {
        self.partner = Some(partner);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn faction(&self) -> Option<Faction> {
        self.faction
    }

    pub fn current_score(&self) -> i64 {
        self.current_score
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    pub fn partner(&self) -> Option<&PlayerId> {
        self.partner.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Join or switch faction. Re-selecting the current one is rejected.
    pub fn choose_faction(&mut self, faction: Faction) -> Result<(), DomainError> {
        if self.faction == Some(faction) {
            return Err(DomainError::validation(format!(
                "already a member of {faction}"
            )));
        }
        self.faction = Some(faction);
        Ok(())
    }

    pub fn link_partner(&mut self, partner: PlayerId) -> Result<(), DomainError> {
        if partner == self.id {
            return Err(DomainError::validation("cannot link with yourself"));
        }
        if self.partner.as_ref() == Some(&partner) {
            return Err(DomainError::validation(format!(
                "already linked with {partner}"
            )));
        }
        self.partner = Some(partner);
        Ok(())
    }

    /// Apply a score change. Current score may go negative; only gains count
    /// towards the lifetime total.
    pub fn adjust_score(&mut self, delta: i64) {
        self.current_score = self.current_score.saturating_add(delta);
        if delta > 0 {
            self.total_score = self.total_score.saturating_add(delta);
        }
    }

    /// Spend score, failing if the balance is short.
    pub fn spend(&mut self, amount: u32, purpose: &str) -> Result<(), DomainError> {
        let amount = i64::from(amount);
        if self.current_score < amount {
            return Err(DomainError::resource(format!(
                "{purpose} costs {amount} points, you have {}",
                self.current_score
            )));
        }
        self.current_score -= amount;
        Ok(())
    }

    /// Set the current score outright; used by content that wipes it.
    pub fn reset_score(&mut self, value: i64) {
        self.current_score = value;
    }
}
