//! Game operation errors.

use cantstop_domain::DomainError;
use cantstop_shared::ErrorKind;

use crate::infrastructure::ports::{CatalogError, RepoError};

/// Errors that can occur while running a game command.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Unknown player {0}, register first")]
    UnknownPlayer(String),
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("You do not own {0}")]
    ItemNotOwned(String),
    #[error("Unsupported command: {0}")]
    Unsupported(String),
    /// A game rule refused the command; the inner kind says which.
    #[error("Rule error: {0}")]
    Domain(#[from] DomainError),
    #[error("Content error: {0}")]
    Content(#[from] CatalogError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl GameError {
    /// Classification shown to the player.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::UnknownPlayer(_) => ErrorKind::Validation,
            GameError::UnknownItem(_) => ErrorKind::Content,
            GameError::ItemNotOwned(_) => ErrorKind::Resource,
            GameError::Unsupported(_) => ErrorKind::Validation,
            GameError::Domain(e) => domain_kind(e),
            GameError::Content(e) => match e {
                CatalogError::UnknownContent(_) | CatalogError::UnknownItem(_) => {
                    ErrorKind::Content
                }
                CatalogError::NotUsable { .. } => ErrorKind::State,
                CatalogError::MissingArgument { .. } | CatalogError::InvalidArgument(_) => {
                    ErrorKind::Validation
                }
                CatalogError::Domain(e) => domain_kind(e),
            },
            GameError::Repo(e) => match e {
                RepoError::Conflict { .. } => ErrorKind::Concurrency,
                RepoError::NotFound { .. } => ErrorKind::Validation,
                RepoError::ConstraintViolation(_) => ErrorKind::Resource,
                RepoError::Database { .. } | RepoError::Serialization(_) => ErrorKind::Internal,
            },
        }
    }

    /// A stale write; the whole command may be run again.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GameError::Repo(e) if e.is_conflict())
    }

    /// Text for the rejection reply, without the internal prefixes.
    pub fn player_message(&self) -> String {
        match self {
            GameError::Domain(e) | GameError::Content(CatalogError::Domain(e)) => match e {
                DomainError::Validation(msg)
                | DomainError::InvalidStateTransition(msg)
                | DomainError::Resource(msg)
                | DomainError::Parse(msg) => msg.clone(),
                DomainError::NotFound { .. } => e.to_string(),
            },
            GameError::Content(e) => e.to_string(),
            GameError::Repo(RepoError::Conflict { .. }) => {
                "the game changed while this command ran, try again".to_string()
            }
            GameError::Repo(RepoError::ConstraintViolation(msg)) => msg.clone(),
            GameError::Repo(RepoError::NotFound { entity_type, id }) => {
                format!("{entity_type} {id} does not exist")
            }
            GameError::Repo(_) => "something went wrong on our side".to_string(),
            other => other.to_string(),
        }
    }
}

fn domain_kind(error: &DomainError) -> ErrorKind {
    match error {
        DomainError::Validation(_) | DomainError::Parse(_) | DomainError::NotFound { .. } => {
            ErrorKind::Validation
        }
        DomainError::InvalidStateTransition(_) => ErrorKind::State,
        DomainError::Resource(_) => ErrorKind::Resource,
    }
}
