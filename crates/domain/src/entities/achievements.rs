use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::AchievementId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedAchievement {
    pub id: AchievementId,
    pub title: String,
    pub earned_at: DateTime<Utc>,
}

/// Achievements a player has earned. Each id is granted at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBook {
    earned: BTreeMap<AchievementId, DateTime<Utc>>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if it was already earned.
    pub fn grant(&mut self, id: AchievementId, now: DateTime<Utc>) -> bool {
        if self.earned.contains_key(&id) {
            return false;
        }
        self.earned.insert(id, now);
        true
    }

    pub fn has(&self, id: &AchievementId) -> bool {
        self.earned.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.earned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.earned.is_empty()
    }

    /// Earned achievements, oldest first.
    pub fn entries(&self) -> Vec<EarnedAchievement> {
        let mut entries: Vec<EarnedAchievement> = self
            .earned
            .iter()
            .map(|(id, earned_at)| EarnedAchievement {
                id: id.clone(),
                title: id.title(),
                earned_at: *earned_at,
            })
            .collect();
        entries.sort_by_key(|entry| entry.earned_at);
        entries
    }
}
