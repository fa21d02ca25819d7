//! Game tuning read from `CANTSTOP_*` environment variables.
//!
//! Supported environment variables:
//! - CANTSTOP_ROLL_COST: points charged per roll (default 10)
//! - CANTSTOP_TOP_OUT_REWARD: points for topping a column (default 10)
//! - CANTSTOP_FIRST_CLEAR_BONUS: extra points for the first player to top a column (default 20)
//! - CANTSTOP_RANK_REWARDS: comma separated rewards for ranks 1.. (default 100,80,50,0)
//! - CANTSTOP_REPEAT_ITEM_REWARD: points for passing an item someone already took (default 10)
//! - CANTSTOP_REPEAT_TRAP_PENALTY: points lost on an already sprung trap (default 10)
//! - CANTSTOP_TOP_OUT_COOLDOWN_MINUTES: lockout after topping a column, 0 disables (default 0)
//! - CANTSTOP_COMMAND_RETRIES: attempts for a command hitting a stale write (default 3)

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub roll_cost: u32,
    pub top_out_reward: u32,
    pub first_clear_bonus: u32,
    /// Index 0 is rank 1. Ranks past the end get nothing.
    pub rank_rewards: Vec<u32>,
    pub repeat_item_reward: u32,
    pub repeat_trap_penalty: u32,
    pub top_out_cooldown_minutes: u32,
    pub command_retries: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            roll_cost: 10,
            top_out_reward: 10,
            first_clear_bonus: 20,
            rank_rewards: vec![100, 80, 50, 0],
            repeat_item_reward: 10,
            repeat_trap_penalty: 10,
            top_out_cooldown_minutes: 0,
            command_retries: 3,
        }
    }
}

impl GameSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Unparseable values
    /// are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let number = |key: &str, current: u32| -> u32 {
            match lookup(key) {
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(value) => {
                        tracing::info!(key, value, "Applied game setting override");
                        value
                    }
                    Err(_) => {
                        tracing::warn!(key, raw = %raw, "Not a valid number, ignoring");
                        current
                    }
                },
                None => current,
            }
        };

        settings.roll_cost = number("CANTSTOP_ROLL_COST", settings.roll_cost);
        settings.top_out_reward = number("CANTSTOP_TOP_OUT_REWARD", settings.top_out_reward);
        settings.first_clear_bonus =
            number("CANTSTOP_FIRST_CLEAR_BONUS", settings.first_clear_bonus);
        settings.repeat_item_reward =
            number("CANTSTOP_REPEAT_ITEM_REWARD", settings.repeat_item_reward);
        settings.repeat_trap_penalty =
            number("CANTSTOP_REPEAT_TRAP_PENALTY", settings.repeat_trap_penalty);
        settings.top_out_cooldown_minutes = number(
            "CANTSTOP_TOP_OUT_COOLDOWN_MINUTES",
            settings.top_out_cooldown_minutes,
        );
        settings.command_retries = number("CANTSTOP_COMMAND_RETRIES", settings.command_retries)
            .max(1);

        if let Some(raw) = lookup("CANTSTOP_RANK_REWARDS") {
            let parsed: Result<Vec<u32>, _> = raw
                .split(',')
                .map(|part| part.trim().parse::<u32>())
                .collect();
            match parsed {
                Ok(rewards) if !rewards.is_empty() => settings.rank_rewards = rewards,
                _ => tracing::warn!(raw = %raw, "CANTSTOP_RANK_REWARDS is not a number list, ignoring"),
            }
        }

        settings
    }

    /// Reward for finishing at `rank` (1-based).
    pub fn rank_reward(&self, rank: u32) -> u32 {
        usize::try_from(rank)
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|index| self.rank_rewards.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// Ranks that earn a title achievement.
    pub fn rewarded_ranks(&self) -> u32 {
        u32::try_from(self.rank_rewards.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let settings = GameSettings::from_lookup(|_| None);
        assert_eq!(settings, GameSettings::default());
        assert_eq!(settings.rank_reward(1), 100);
        assert_eq!(settings.rank_reward(4), 0);
        assert_eq!(settings.rank_reward(9), 0);
        assert_eq!(settings.rank_reward(0), 0);
    }

    #[test]
    fn overrides_are_applied() {
        let settings = GameSettings::from_lookup(lookup(&[
            ("CANTSTOP_ROLL_COST", "5"),
            ("CANTSTOP_RANK_REWARDS", "300, 200"),
            ("CANTSTOP_TOP_OUT_COOLDOWN_MINUTES", "30"),
        ]));
        assert_eq!(settings.roll_cost, 5);
        assert_eq!(settings.rank_rewards, vec![300, 200]);
        assert_eq!(settings.rewarded_ranks(), 2);
        assert_eq!(settings.top_out_cooldown_minutes, 30);
    }

    #[test]
    fn invalid_values_are_ignored() {
        let settings = GameSettings::from_lookup(lookup(&[
            ("CANTSTOP_ROLL_COST", "cheap"),
            ("CANTSTOP_RANK_REWARDS", "1,x"),
            ("CANTSTOP_COMMAND_RETRIES", "0"),
        ]));
        assert_eq!(settings.roll_cost, 10);
        assert_eq!(settings.rank_rewards, vec![100, 80, 50, 0]);
        assert_eq!(settings.command_retries, 1);
    }
}
