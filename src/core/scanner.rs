//! Key-value option scanner
//!
//! Splits the tokens following a route's literal prefix into `-key value`
//! pairs and the positional remainder. Options must come before positionals.

use crate::error::ParseError;
use log::trace;
use std::collections::BTreeMap;

/// Result of scanning the option region of a token slice
#[derive(Debug, Clone, PartialEq)]
pub enum OptionScan<'a> {
    /// The help marker was seen while awaiting a key
    Help,
    /// Options collected, followed by the positional tokens
    Options {
        pairs: BTreeMap<String, String>,
        positional: &'a [String],
    },
}

#[derive(Debug)]
enum State<'a> {
    AwaitingKey,
    AwaitingValue(&'a str),
}

/// Scan `args` for `<prefix><key> <value>` pairs.
///
/// A later pair with the same key overwrites an earlier one.
pub fn scan_options<'a>(
    args: &'a [String],
    option_prefix: &str,
    help_marker: &str,
) -> std::result::Result<OptionScan<'a>, ParseError> {
    let mut pairs = BTreeMap::new();
    let mut state = State::AwaitingKey;

    for (index, arg) in args.iter().enumerate() {
        state = match state {
            State::AwaitingKey => {
                if arg == help_marker {
                    trace!("help marker at position {}", index);
                    return Ok(OptionScan::Help);
                }
                match arg.strip_prefix(option_prefix) {
                    Some(key) => State::AwaitingValue(key),
                    None => {
                        return Ok(OptionScan::Options {
                            pairs,
                            positional: &args[index..],
                        })
                    }
                }
            }
            State::AwaitingValue(key) => {
                pairs.insert(key.to_string(), arg.clone());
                State::AwaitingKey
            }
        };
    }

    match state {
        State::AwaitingValue(key) => Err(ParseError::missing_value(key)),
        State::AwaitingKey => Ok(OptionScan::Options {
            pairs,
            positional: &args[args.len()..],
        }),
    }
}
