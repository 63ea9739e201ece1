//! Semantic types and raw token coercion
//!
//! Every bindable payload field has one of four semantic types. Raw tokens are
//! converted into [`Scalar`]s of that type, which are then fed to the
//! payload's `Deserialize` impl when it is rebuilt.

use crate::error::ParseError;
use serde::de::{self, Visitor};
use std::fmt;

/// Coercion targets for raw tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    String,
    Integer,
    Float,
    Boolean,
}

impl SemanticType {
    /// Convert a raw token into a value of this type
    pub fn coerce(self, input: &str) -> std::result::Result<Scalar, ParseError> {
        match self {
            Self::String => Ok(Scalar::String(input.to_string())),
            Self::Integer => input
                .parse::<i64>()
                .map(Scalar::Integer)
                .map_err(|e| ParseError::conversion(input, self, e)),
            Self::Float => input
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|e| ParseError::conversion(input, self, e)),
            Self::Boolean => parse_bool(input)
                .map(Scalar::Boolean)
                .ok_or_else(|| ParseError::conversion(input, self, "expected true or false")),
        }
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    if input.eq_ignore_ascii_case("true") {
        Some(true)
    } else if input.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "bool"),
        }
    }
}

/// A coerced token, or a float captured from a default value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Self::String(_) => SemanticType::String,
            Self::Integer(_) => SemanticType::Integer,
            Self::Float(_) => SemanticType::Float,
            Self::Boolean(_) => SemanticType::Boolean,
        }
    }

    /// Hand the value to `visitor` as its primitive serde type
    pub(crate) fn visit<'de, V, E>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
        E: de::Error,
    {
        match self {
            Self::String(s) => visitor.visit_string(s),
            Self::Integer(i) => visitor.visit_i64(i),
            Self::Float(f) => visitor.visit_f64(f),
            Self::Boolean(b) => visitor.visit_bool(b),
        }
    }
}
