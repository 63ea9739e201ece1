//! Registered routes
//!
//! Each route is generic over its options payload `T` and positional payload
//! `U`. The router stores them behind the [`Route`] trait so routes with
//! different payload types can live in one table.

use super::binder::{ArgumentBinder, Bound};
use super::shape::ShapeDescriptor;
use crate::error::{BoxError, ParseError};
use crate::router::RouterConfig;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Handler signature once the error type has been erased
pub type Handler<T, U> = Box<dyn Fn(T, U) -> std::result::Result<(), BoxError>>;

/// What happened when a route was offered an argument vector
#[derive(Debug)]
pub enum Outcome {
    /// The literal prefix did not match
    NotMatched,
    /// The route matched and completed, either by showing help or by
    /// running its handler
    Handled { help_shown: bool },
    /// The route matched but binding failed
    ParseFailed(ParseError),
    /// The route matched and its handler returned an error
    HandlerFailed(BoxError),
}

/// A type-erased route
pub trait Route {
    /// Literal prefix tokens
    fn tokens(&self) -> &[String];

    /// Literal prefix joined by single spaces
    fn label(&self) -> &str;

    /// Help text shown for the help marker
    fn help(&self) -> &str;

    /// Match `args` against this route and, on a match, bind and run it
    fn try_match(&self, args: &[String], config: &RouterConfig, help: &dyn Fn(&str)) -> Outcome;

    /// Whether the leading tokens of `args` equal this route's prefix
    fn matches_prefix(&self, args: &[String]) -> bool {
        let tokens = self.tokens();
        args.len() >= tokens.len() && tokens.iter().zip(args).all(|(t, a)| t == a)
    }
}

/// A route with concrete payload types
pub struct TypedRoute<T, U> {
    tokens: Vec<String>,
    label: String,
    help: String,
    defaults: T,
    options_shape: ShapeDescriptor,
    positional_shape: ShapeDescriptor,
    handler: Handler<T, U>,
}

impl<T, U> TypedRoute<T, U>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
    U: Serialize + DeserializeOwned + 'static,
{
    /// Build a route from a whitespace-separated command, describing both
    /// payloads from the given values.
    pub fn new<F, E>(
        command: &str,
        handler: F,
        defaults: T,
        positional_zero: &U,
        help: impl Into<String>,
    ) -> Self
    where
        F: Fn(T, U) -> std::result::Result<(), E> + 'static,
        E: Into<BoxError> + 'static,
    {
        let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        let label = tokens.join(" ");
        let options_shape = ShapeDescriptor::named(&defaults);
        let positional_shape = ShapeDescriptor::positional(positional_zero);
        let erased: Handler<T, U> =
            Box::new(move |options: T, args: U| handler(options, args).map_err(Into::into));

        Self {
            tokens,
            label,
            help: help.into(),
            defaults,
            options_shape,
            positional_shape,
            handler: erased,
        }
    }

    pub fn options_shape(&self) -> &ShapeDescriptor {
        &self.options_shape
    }

    pub fn positional_shape(&self) -> &ShapeDescriptor {
        &self.positional_shape
    }
}

impl<T, U> Route for TypedRoute<T, U>
where
    T: Clone + DeserializeOwned,
    U: DeserializeOwned,
{
    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn try_match(&self, args: &[String], config: &RouterConfig, help: &dyn Fn(&str)) -> Outcome {
        if !self.matches_prefix(args) {
            return Outcome::NotMatched;
        }
        let remaining = &args[self.tokens.len()..];
        debug!(
            "matched command '{}' with {} remaining args",
            self.label,
            remaining.len()
        );

        let bound = ArgumentBinder::new(config).bind::<T, U>(
            remaining,
            &self.defaults,
            &self.options_shape,
            &self.positional_shape,
        );

        match bound {
            Err(e) => Outcome::ParseFailed(e),
            Ok(Bound::Help) => {
                help(&self.help);
                Outcome::Handled { help_shown: true }
            }
            Ok(Bound::Payloads { options, args }) => match (self.handler)(options, args) {
                Ok(()) => Outcome::Handled { help_shown: false },
                Err(e) => Outcome::HandlerFailed(e),
            },
        }
    }
}

impl<T, U> fmt::Debug for TypedRoute<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRoute")
            .field("label", &self.label)
            .field("options", &self.options_shape.len())
            .field("args", &self.positional_shape.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Args {
        name: String,
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn route(seen: Rc<RefCell<Vec<String>>>) -> TypedRoute<(), Args> {
        TypedRoute::new(
            "  cmd   exe ",
            move |_: (), a: Args| {
                seen.borrow_mut().push(a.name);
                Ok::<(), BoxError>(())
            },
            (),
            &Args::default(),
            "cmd exe <name>",
        )
    }

    #[test]
    fn test_label_collapses_whitespace() {
        let r = route(Rc::default());
        assert_eq!(r.label(), "cmd exe");
        assert_eq!(r.tokens(), &["cmd".to_string(), "exe".to_string()][..]);
        assert_eq!(r.help(), "cmd exe <name>");
        assert_eq!(r.positional_shape().len(), 1);
        assert!(r.options_shape().is_empty());
    }

    #[test]
    fn test_prefix_matching() {
        let r = route(Rc::default());
        assert!(r.matches_prefix(&args(&["cmd", "exe"])));
        assert!(r.matches_prefix(&args(&["cmd", "exe", "x"])));
        assert!(!r.matches_prefix(&args(&["cmd"])));
        assert!(!r.matches_prefix(&args(&["cmd", "EXE", "x"])));
        assert!(!r.matches_prefix(&args(&["cmd", "ex", "x"])));
    }

    #[test]
    fn test_try_match_runs_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let r = route(seen.clone());
        let config = RouterConfig::default();

        let outcome = r.try_match(&args(&["cmd", "exe", "bob"]), &config, &|_: &str| {});
        assert!(matches!(outcome, Outcome::Handled { help_shown: false }));
        assert_eq!(*seen.borrow(), vec!["bob".to_string()]);

        let outcome = r.try_match(&args(&["other"]), &config, &|_: &str| {});
        assert!(matches!(outcome, Outcome::NotMatched));
    }

    #[test]
    fn test_try_match_help() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let r = route(seen.clone());
        let config = RouterConfig::default();
        let printed = RefCell::new(String::new());

        let outcome = r.try_match(&args(&["cmd", "exe", "-h"]), &config, &|text: &str| {
            printed.borrow_mut().push_str(text)
        });
        assert!(matches!(outcome, Outcome::Handled { help_shown: true }));
        assert_eq!(*printed.borrow(), "cmd exe <name>");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_handler_error_is_reported() {
        let r: TypedRoute<(), ()> = TypedRoute::new(
            "fail",
            |_: (), _: ()| Err(std::io::Error::other("boom")),
            (),
            &(),
            "",
        );
        let outcome = r.try_match(&args(&["fail"]), &RouterConfig::default(), &|_: &str| {});
        match outcome {
            Outcome::HandlerFailed(e) => assert_eq!(e.to_string(), "boom"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
