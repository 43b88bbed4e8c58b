//! Unified error type for world operations.
//!
//! Every user-visible failure in the world model is one of these
//! variants; the driver decides how each category is surfaced (see the
//! engine crate). `Parse` and `ActionRefused` messages are shown to
//! the player verbatim.

use thiserror::Error;

/// Unified error type for world and soul operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The utterance was structurally invalid. Does not count as a turn.
    #[error("{0}")]
    Parse(String),

    /// The first word was not a recognised verb. The driver converts
    /// this to a friendly message (with a movement hint if applicable).
    #[error("The verb '{verb}' is unrecognized.")]
    UnknownVerb {
        verb: String,
        words: Vec<String>,
        qualifier: Option<String>,
    },

    /// The world rejected the action (locked door, refused move, ...).
    #[error("{0}")]
    ActionRefused(String),

    /// A caller without the required privilege invoked a privileged
    /// operation. Treated like a refusal when surfaced.
    #[error("{0}")]
    SecurityViolation(String),
}

impl WorldError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an action-refused error
    pub fn refused(msg: impl Into<String>) -> Self {
        Self::ActionRefused(msg.into())
    }

    /// Create a security violation error
    pub fn security(msg: impl Into<String>) -> Self {
        Self::SecurityViolation(msg.into())
    }

    pub fn unknown_verb(verb: impl Into<String>) -> Self {
        Self::UnknownVerb {
            verb: verb.into(),
            words: Vec::new(),
            qualifier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_display_their_message_verbatim() {
        let err = WorldError::parse("It is not clear who you mean.");
        assert_eq!(err.to_string(), "It is not clear who you mean.");
    }

    #[test]
    fn unknown_verb_carries_the_offending_word() {
        let err = WorldError::UnknownVerb {
            verb: "frobnicate".into(),
            words: vec!["the".into(), "gate".into()],
            qualifier: Some("fail".into()),
        };
        assert_eq!(err.to_string(), "The verb 'frobnicate' is unrecognized.");
    }
}
