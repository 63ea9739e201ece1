//! Argument binding
//!
//! Turns the tokens left after a route's literal prefix into the route's
//! options and positional payloads:
//!
//! 1. scan `-key value` pairs until the first token without the option prefix
//! 2. write each pair into the options payload, keeping defaults for the rest
//! 3. write the remaining tokens into the positional payload, one per field

use super::scanner::{scan_options, OptionScan};
use super::shape::ShapeDescriptor;
use crate::error::ParseError;
use crate::router::RouterConfig;
use log::trace;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Result of a successful bind
#[derive(Debug, Clone, PartialEq)]
pub enum Bound<T, U> {
    /// The help marker was given; nothing was bound
    Help,
    /// Both payloads were filled
    Payloads { options: T, args: U },
}

/// Binds token slices according to a router configuration
#[derive(Debug, Clone, Copy)]
pub struct ArgumentBinder<'a> {
    config: &'a RouterConfig,
}

impl<'a> ArgumentBinder<'a> {
    pub fn new(config: &'a RouterConfig) -> Self {
        Self { config }
    }

    /// Bind `args` into an options value derived from `defaults` and a
    /// positional value described by `positional_shape`.
    pub fn bind<T, U>(
        &self,
        args: &[String],
        defaults: &T,
        options_shape: &ShapeDescriptor,
        positional_shape: &ShapeDescriptor,
    ) -> std::result::Result<Bound<T, U>, ParseError>
    where
        T: Clone + DeserializeOwned,
        U: DeserializeOwned,
    {
        let (pairs, positional) =
            match scan_options(args, &self.config.option_prefix, &self.config.help_marker)? {
                OptionScan::Help => return Ok(Bound::Help),
                OptionScan::Options { pairs, positional } => (pairs, positional),
            };

        let options = bind_options(&pairs, defaults, options_shape)?;
        let args = bind_positional(positional, positional_shape)?;
        Ok(Bound::Payloads { options, args })
    }
}

fn bind_options<T>(
    pairs: &BTreeMap<String, String>,
    defaults: &T,
    shape: &ShapeDescriptor,
) -> std::result::Result<T, ParseError>
where
    T: Clone + DeserializeOwned,
{
    if pairs.is_empty() {
        return Ok(defaults.clone());
    }

    let mut builder = shape.builder()?;
    for (key, raw) in pairs {
        let field = shape
            .field_by_key(key)
            .ok_or_else(|| ParseError::invalid_option(key.as_str()))?;
        trace!("option '{}' = '{}'", key, raw);
        builder.set(field, raw)?;
    }
    builder.finish()
}

fn bind_positional<U>(
    tokens: &[String],
    shape: &ShapeDescriptor,
) -> std::result::Result<U, ParseError>
where
    U: DeserializeOwned,
{
    let mut builder = shape.builder()?;
    if tokens.len() != shape.len() {
        return Err(ParseError::arg_count(shape.len(), tokens.len()));
    }
    for (field, raw) in shape.fields().iter().zip(tokens) {
        trace!("arg '{}' = '{}'", field.name(), raw);
        builder.set(field, raw)?;
    }
    builder.finish()
}
