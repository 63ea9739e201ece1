//! Error types for the argrouter library
//!
//! Dispatch failures fall into three categories: no registered route matched
//! the input, the matched route could not bind its arguments, or the handler
//! itself failed. Binding failures carry a [`ParseError`] describing the
//! offending token or key.

use crate::core::value::SemanticType;
use std::fmt;
use thiserror::Error;

/// Error type returned by command handlers once erased by the router
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type returned by [`Router::run`](crate::Router::run)
#[derive(Error, Debug)]
pub enum RouterError {
    /// No route's literal prefix matched the input
    #[error("could not find matching command for the arguments {input:?}")]
    NoMatch { input: Vec<String> },

    /// A route matched but its arguments could not be bound
    #[error("failed to parse arguments for command '{command}': {source}")]
    Parse {
        command: String,
        #[source]
        source: ParseError,
    },

    /// The handler of the matched route reported an error
    #[error("failed to run command '{command}': {source}")]
    Handler {
        command: String,
        #[source]
        source: BoxError,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RouterError>;

impl RouterError {
    /// Create a new no-match error echoing the full input
    pub fn no_match(input: &[String]) -> Self {
        Self::NoMatch {
            input: input.to_vec(),
        }
    }

    /// Create a new parse error for the given command label
    pub fn parse(command: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            command: command.into(),
            source,
        }
    }

    /// Create a new handler error for the given command label
    pub fn handler(command: impl Into<String>, source: BoxError) -> Self {
        Self::Handler {
            command: command.into(),
            source,
        }
    }

    /// Label of the matched command, if any route matched
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::NoMatch { .. } => None,
            Self::Parse { command, .. } | Self::Handler { command, .. } => Some(command),
        }
    }

    /// The binding failure, when this is a parse error
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Get the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoMatch { .. } => ErrorCategory::NoMatch,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Handler { .. } => ErrorCategory::Handler,
        }
    }
}

/// Failures raised while binding tokens into a route's payloads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended while an option key was waiting for its value
    #[error("option '{key}' given no value")]
    MissingValue { key: String },

    /// The option key is not a field of the options payload
    #[error("invalid option '{key}'")]
    InvalidOption { key: String },

    /// Positional token count differs from the positional field count
    #[error("expected {expected} args but got {got}")]
    ArgCount { expected: usize, got: usize },

    /// A raw token could not be converted to the field's semantic type
    #[error("failed to parse '{input}' to a {target}: {reason}")]
    Conversion {
        input: String,
        target: SemanticType,
        reason: String,
    },

    /// The payload field has a type the binder cannot fill
    #[error("unsupported type for field '{field}': {found}")]
    UnsupportedType { field: String, found: String },

    /// The payload value is not a struct of named fields
    #[error("payload is not a struct: {reason}")]
    Shape { reason: String },

    /// The bound values could not be turned back into the payload type
    #[error("invalid value for payload: {reason}")]
    Payload { reason: String },
}

impl ParseError {
    /// Create a new missing value error
    pub fn missing_value(key: impl Into<String>) -> Self {
        Self::MissingValue { key: key.into() }
    }

    /// Create a new invalid option error
    pub fn invalid_option(key: impl Into<String>) -> Self {
        Self::InvalidOption { key: key.into() }
    }

    /// Create a new positional arity error
    pub fn arg_count(expected: usize, got: usize) -> Self {
        Self::ArgCount { expected, got }
    }

    /// Create a new conversion error
    pub fn conversion(
        input: impl Into<String>,
        target: SemanticType,
        reason: impl fmt::Display,
    ) -> Self {
        Self::Conversion {
            input: input.into(),
            target,
            reason: reason.to_string(),
        }
    }

    /// Create a new unsupported type error
    pub fn unsupported_type(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnsupportedType {
            field: field.into(),
            found: found.into(),
        }
    }

    /// Create a new shape error
    pub fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }

    /// Create a new payload rebuild error
    pub fn payload(reason: impl fmt::Display) -> Self {
        Self::Payload {
            reason: reason.to_string(),
        }
    }
}

/// Error categories, used by embedders to pick exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NoMatch,
    Parse,
    Handler,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "NO_MATCH"),
            Self::Parse => write!(f, "PARSE"),
            Self::Handler => write!(f, "HANDLER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RouterError::parse("test", ParseError::arg_count(2, 1));
        assert!(matches!(err, RouterError::Parse { .. }));
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert_eq!(err.command(), Some("test"));
        assert_eq!(err.parse_error(), Some(&ParseError::arg_count(2, 1)));
    }

    #[test]
    fn test_no_match_echoes_input() {
        let input = vec!["test2".to_string(), "11".to_string()];
        let err = RouterError::no_match(&input);
        assert_eq!(err.category(), ErrorCategory::NoMatch);
        assert_eq!(err.command(), None);
        let message = err.to_string();
        assert!(message.contains("test2"));
        assert!(message.contains("11"));
    }

    #[test]
    fn test_handler_error_category() {
        let err = RouterError::handler("cmd exe", "boom".into());
        assert_eq!(err.category(), ErrorCategory::Handler);
        assert!(err.parse_error().is_none());
        assert_eq!(err.to_string(), "failed to run command 'cmd exe': boom");
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            ParseError::arg_count(2, 1).to_string(),
            "expected 2 args but got 1"
        );
        assert_eq!(
            ParseError::missing_value("option-1").to_string(),
            "option 'option-1' given no value"
        );
        assert_eq!(
            ParseError::invalid_option("nope").to_string(),
            "invalid option 'nope'"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = RouterError::parse("test", ParseError::invalid_option("x"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "invalid option 'x'");
    }
}
