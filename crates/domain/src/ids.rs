use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

/// Numeric catalog ids. The display prefix matches the board notation
/// (`E12`, `I3`, `T7`).
macro_rules! define_content_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u16);

        impl $name {
            pub const fn new(raw: u16) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u16 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

// One id per started round, stamped on dice history entries
define_id!(RoundId);

define_content_id!(EncounterId, "E");
define_content_id!(ItemId, "I");
define_content_id!(TrapId, "T");

impl ItemId {
    /// Ids from this value up are keepsakes handed out by encounters; they
    /// cannot be bought or used.
    pub const HIDDEN_THRESHOLD: u16 = 9000;

    pub fn is_hidden(self) -> bool {
        self.0 >= Self::HIDDEN_THRESHOLD
    }
}

/// Chat-platform user id. Opaque, non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("player id cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

/// Board column, identified by the dice sum that selects it (3..=18).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColumnId(u8);

impl ColumnId {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 18;

    pub fn new(raw: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(DomainError::validation(format!(
                "column {raw} does not exist (columns are {}-{})",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Accepts any integer width the protocol hands over.
    pub fn from_value(raw: impl TryInto<u8>) -> Result<Self, DomainError> {
        let raw: u8 = raw
            .try_into()
            .map_err(|_| DomainError::validation("column out of range"))?;
        Self::new(raw)
    }

    pub(crate) const fn new_unchecked(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = ColumnId> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ColumnId {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnId> for u8 {
    fn from(value: ColumnId) -> Self {
        value.0
    }
}

/// Achievement key. Content-derived achievements are namespaced
/// (`trap:3`, `first_clear:7`, `rank:1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(String);

impl AchievementId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn all_ones() -> Self {
        Self::new("hidden:all_ones")
    }

    pub fn all_sixes() -> Self {
        Self::new("hidden:all_sixes")
    }

    /// Three distinct traps sprung for the first time.
    pub fn bad_luck() -> Self {
        Self::new("hidden:bad_luck")
    }

    /// Five board items collected.
    pub fn collector() -> Self {
        Self::new("hidden:collector")
    }

    /// Three failed rounds.
    pub fn crying_student() -> Self {
        Self::new("hidden:crying_student")
    }

    pub fn trap(trap: TrapId) -> Self {
        Self(format!("trap:{}", trap.get()))
    }

    pub fn first_clear(column: ColumnId) -> Self {
        Self(format!("first_clear:{}", column.get()))
    }

    pub fn rank(rank: u32) -> Self {
        Self(format!("rank:{rank}"))
    }

    pub fn encounter(slug: &str) -> Self {
        Self(format!("encounter:{slug}"))
    }

    /// Display title for achievements with a fixed name.
    pub fn title(&self) -> String {
        match self.0.as_str() {
            "hidden:all_ones" => "Silent Thunder".to_string(),
            "hidden:all_sixes" => "Six Six Smooth".to_string(),
            "hidden:bad_luck" => "Born Unlucky".to_string(),
            "hidden:collector" => "Collector".to_string(),
            "hidden:crying_student" => "Crying Student".to_string(),
            "rank:1" => "Game King".to_string(),
            "rank:2" => "Silver Flash".to_string(),
            "rank:3" => "Lucky Trio".to_string(),
            "rank:4" => "One Step Away".to_string(),
            other => match other.split_once(':') {
                Some(("first_clear", column)) => format!("First to top column {column}"),
                Some(("trap", id)) => format!("Survived trap T{id}"),
                Some((_, slug)) => slug.replace('_', " "),
                None => other.to_string(),
            },
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_id_rejects_out_of_range() {
        assert!(ColumnId::new(2).is_err());
        assert!(ColumnId::new(19).is_err());
        assert_eq!(ColumnId::new(3).map(ColumnId::get), Ok(3));
        assert_eq!(ColumnId::all().count(), 16);
    }

    #[test]
    fn column_id_deserialization_is_validated() {
        let ok: Result<ColumnId, _> = serde_json::from_str("7");
        assert!(ok.is_ok());
        let bad: Result<ColumnId, _> = serde_json::from_str("25");
        assert!(bad.is_err());
    }

    #[test]
    fn player_id_is_trimmed_and_non_empty() {
        assert!(PlayerId::new("   ").is_err());
        let id = PlayerId::new(" 10001 ").expect("valid id");
        assert_eq!(id.as_str(), "10001");
    }

    #[test]
    fn content_ids_display_with_board_prefix() {
        assert_eq!(EncounterId::new(12).to_string(), "E12");
        assert_eq!(TrapId::new(3).to_string(), "T3");
        assert!(ItemId::new(9101).is_hidden());
        assert!(!ItemId::new(24).is_hidden());
    }

    #[test]
    fn achievement_titles() {
        assert_eq!(AchievementId::rank(1).title(), "Game King");
        let column = ColumnId::new(7).expect("valid column");
        assert_eq!(
            AchievementId::first_clear(column).title(),
            "First to top column 7"
        );
    }
}
