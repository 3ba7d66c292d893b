//! Error types.
//!
//! Two kinds of failure exist:
//!
//! - [`Error::Syntax`]: the *input* is malformed (lexically or syntactically).
//!   The message names the offending character or token and, where possible, what was expected.
//! - [`Error::System`]: an internal contract was violated, e.g. an operator outside the minimal
//!   set reached the model checker. Well-formed parser output never triggers it.
//!
//! Both display as the bare message, so callers can compare messages verbatim.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed user input.
    #[error("{0}")]
    Syntax(String),

    /// Internal invariant violation.
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }

    pub fn system(message: impl Into<String>) -> Self {
        Error::System(message.into())
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Error::System(_))
    }

    /// The human-readable message, without any kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Syntax(message) | Error::System(message) => message,
        }
    }

    pub(crate) fn unknown_character(c: char) -> Self {
        Error::syntax(format!("Unknown character: '{}'.", c))
    }

    pub(crate) fn unexpected_end() -> Self {
        Error::syntax("Unexpected end of input.")
    }

    pub(crate) fn unexpected_operator(value: &str) -> Self {
        Error::system(format!("Expected an operator but found '{}'.", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_display_is_bare_message() {
        let e = Error::unknown_character('$');
        assert_eq!(e.to_string(), "Unknown character: '$'.");
        assert!(e.is_syntax());
        assert!(!e.is_system());
    }

    #[test]
    fn test_system_error() {
        let e = Error::unexpected_operator("AG");
        assert!(e.is_system());
        assert_eq!(e.message(), "Expected an operator but found 'AG'.");
    }
}
