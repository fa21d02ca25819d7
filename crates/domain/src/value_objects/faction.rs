//! Player factions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The two factions a player can join. Some shop items and content branches
/// are restricted to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Adopter,
    Aeonreth,
}

impl Faction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Adopter => "adopter",
            Faction::Aeonreth => "aeonreth",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Adopter => write!(f, "Adopter"),
            Faction::Aeonreth => write!(f, "Aeonreth"),
        }
    }
}

impl FromStr for Faction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adopter" | "a" | "收养人" => Ok(Faction::Adopter),
            "aeonreth" | "ae" | "b" => Ok(Faction::Aeonreth),
            other => Err(DomainError::validation(format!(
                "unknown faction '{other}', choose adopter or aeonreth"
            ))),
        }
    }
}
