//! Replies sent back for every command.

use serde::{Deserialize, Serialize};

// =============================================================================
// Command Reply
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandReply {
    Ok {
        /// Lines of narrative text, in order.
        messages: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Rejected {
        kind: ErrorKind,
        message: String,
    },
}

impl CommandReply {
    pub fn ok(messages: Vec<String>) -> Self {
        CommandReply::Ok {
            messages,
            data: None,
        }
    }

    /// Success with a data payload
    pub fn ok_with<T: Serialize>(messages: Vec<String>, data: &T) -> Self {
        CommandReply::Ok {
            messages,
            data: serde_json::to_value(data).ok(),
        }
    }

    pub fn rejected(kind: ErrorKind, message: impl Into<String>) -> Self {
        CommandReply::Rejected {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandReply::Ok { .. })
    }

    pub fn messages(&self) -> &[String] {
        match self {
            CommandReply::Ok { messages, .. } => messages,
            CommandReply::Rejected { .. } => &[],
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            CommandReply::Ok { .. } => None,
            CommandReply::Rejected { kind, .. } => Some(*kind),
        }
    }
}

// =============================================================================
// Error Kinds
// =============================================================================

/// Error classification shown to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed column, value, choice or dice split
    Validation,
    /// Not allowed in the current round state
    State,
    /// Not enough score, item not owned, limit reached
    Resource,
    /// Stored state changed underneath; retry
    Concurrency,
    /// Unknown content or item
    Content,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_serializes_with_status_tag() {
        let reply = CommandReply::rejected(ErrorKind::State, "no round in progress");
        let json = serde_json::to_value(&reply).expect("serializable");
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["kind"], "state");
        assert_eq!(reply.error_kind(), Some(ErrorKind::State));
    }

    #[test]
    fn ok_reply_skips_empty_data() {
        let json = serde_json::to_string(&CommandReply::ok(vec!["Rolled 1 2 3".into()]))
            .expect("serializable");
        assert!(!json.contains("data"));
    }
}
