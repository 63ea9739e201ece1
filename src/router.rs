//! The route table
//!
//! Routes are kept ordered by descending literal prefix length, with routes
//! of equal length in registration order. Dispatch offers the argument vector
//! to each route in that order and stops at the first whose prefix matches,
//! whether or not binding then succeeds.

use crate::core::route::{Outcome, Route, TypedRoute};
use crate::error::{BoxError, Result, RouterError};
use crate::io::{args::os_args, help::no_help};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Configuration for option scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Marker that starts an option key, stripped from the key
    pub option_prefix: String,
    /// Token that requests a route's help text
    pub help_marker: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            option_prefix: "-".to_string(),
            help_marker: "-h".to_string(),
        }
    }
}

/// A successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Label of the route that handled the input
    pub command: String,
    /// Whether the help marker was given instead of running the handler
    pub help_shown: bool,
}

/// Routes argument vectors to typed handlers
pub struct Router {
    routes: Vec<Box<dyn Route>>,
    help: Box<dyn Fn(&str)>,
    config: RouterConfig,
}

impl Router {
    /// Create a router that discards help text
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router that passes help text to `help`
    pub fn with_help<H>(help: H) -> Self
    where
        H: Fn(&str) + 'static,
    {
        let mut router = Self::new();
        router.set_help(help);
        router
    }

    /// Create a router with custom configuration
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            help: Box::new(no_help),
            config,
        }
    }

    /// Replace the help collaborator
    pub fn set_help<H>(&mut self, help: H)
    where
        H: Fn(&str) + 'static,
    {
        self.help = Box::new(help);
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register `handler` under the whitespace-separated `command`.
    ///
    /// `default_options` supplies the values of options not given on the
    /// command line, and its serialized field names are the option keys. The
    /// positional payload is described from `U::default()`.
    ///
    /// When no option is given the handler receives a clone of
    /// `default_options`. Otherwise the options payload is rebuilt through
    /// its `Deserialize` impl, so fields that are not serialized, such as
    /// `#[serde(skip)]` fields, take the value that impl gives them
    /// (`Default::default()` for `skip`) rather than the registered one.
    pub fn route<T, U, F, E>(
        &mut self,
        command: &str,
        handler: F,
        default_options: T,
        help: impl Into<String>,
    ) -> &mut Self
    where
        T: Clone + Serialize + DeserializeOwned + 'static,
        U: Default + Serialize + DeserializeOwned + 'static,
        F: Fn(T, U) -> std::result::Result<(), E> + 'static,
        E: Into<BoxError> + 'static,
    {
        self.route_with_args(command, handler, default_options, U::default(), help)
    }

    /// Like [`route`](Self::route), describing the positional payload from
    /// an explicit value instead of `U::default()`.
    pub fn route_with_args<T, U, F, E>(
        &mut self,
        command: &str,
        handler: F,
        default_options: T,
        positional_zero: U,
        help: impl Into<String>,
    ) -> &mut Self
    where
        T: Clone + Serialize + DeserializeOwned + 'static,
        U: Serialize + DeserializeOwned + 'static,
        F: Fn(T, U) -> std::result::Result<(), E> + 'static,
        E: Into<BoxError> + 'static,
    {
        let route = TypedRoute::new(command, handler, default_options, &positional_zero, help);
        debug!("registered command '{}'", route.label());
        self.insert(Box::new(route));
        self
    }

    fn insert(&mut self, route: Box<dyn Route>) {
        let len = route.tokens().len();
        let at = self.routes.partition_point(|r| r.tokens().len() >= len);
        self.routes.insert(at, route);
    }

    /// Dispatch an argument vector, not including the program name
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<Dispatched> {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
        self.dispatch(&args)
    }

    /// Dispatch the argument vector produced by `source`
    pub fn run_from<F>(&self, source: F) -> Result<Dispatched>
    where
        F: FnOnce() -> Vec<String>,
    {
        self.dispatch(&source())
    }

    /// Dispatch the process arguments, minus the program name
    pub fn run_os(&self) -> Result<Dispatched> {
        self.run_from(os_args)
    }

    fn dispatch(&self, args: &[String]) -> Result<Dispatched> {
        for route in &self.routes {
            let command = route.label();
            match route.try_match(args, &self.config, &*self.help) {
                Outcome::NotMatched => continue,
                Outcome::Handled { help_shown } => {
                    return Ok(Dispatched {
                        command: command.to_string(),
                        help_shown,
                    })
                }
                Outcome::ParseFailed(e) => return Err(RouterError::parse(command, e)),
                Outcome::HandlerFailed(e) => return Err(RouterError::handler(command, e)),
            }
        }
        debug!("no command matched {:?}", args);
        Err(RouterError::no_match(args))
    }

    /// Labels and help texts of all routes, in the order they are tried
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|r| (r.label(), r.help()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("commands", &self.commands().map(|(c, _)| c).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
