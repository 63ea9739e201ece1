//! argrouter: route command-line argument vectors onto typed handlers
//!
//! Commands are registered as a whitespace-separated literal path together
//! with two payload types: a struct of named options and a struct of
//! positional arguments. Dispatch picks the route with the longest matching
//! literal prefix, binds the remaining tokens into both payloads and calls the
//! handler.
//!
//! # Features
//!
//! - **Longest prefix wins**: `cmd exe` is tried before `cmd`, whatever the
//!   registration order
//! - **Typed payloads** described by serde, with `#[serde(rename)]` naming
//!   option keys
//! - **Exact positional arity** checked before the handler runs
//! - **Structured errors** separating no match, parse and handler failures
//!
//! # Quick Start
//!
//! ```rust
//! use argrouter::{Router, Result};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct GreetOptions {
//!     #[serde(rename = "times")]
//!     repeat: i64,
//!     shout: bool,
//! }
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct GreetArgs {
//!     name: String,
//! }
//!
//! fn main() -> Result<()> {
//!     let mut router = Router::new();
//!     router.route(
//!         "greet",
//!         |options: GreetOptions, args: GreetArgs| -> anyhow::Result<()> {
//!             for _ in 0..options.repeat {
//!                 println!("hello {}", args.name);
//!             }
//!             Ok(())
//!         },
//!         GreetOptions { repeat: 1, shout: false },
//!         "greet [-times N] [-shout BOOL] <name>",
//!     );
//!
//!     let dispatched = router.run(&["greet", "-times", "2", "world"])?;
//!     assert_eq!(dispatched.command, "greet");
//!     Ok(())
//! }
//! ```
//!
//! ## Handling failures
//!
//! ```rust
//! use argrouter::{ErrorCategory, ParseError, Router};
//!
//! let mut router = Router::new();
//! router.route("cmd", |_: (), _: ()| Ok::<(), std::io::Error>(()), (), "");
//!
//! let err = router.run(&["cmd", "extra"]).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Parse);
//! assert_eq!(err.parse_error(), Some(&ParseError::arg_count(0, 1)));
//!
//! let err = router.run(&["other"]).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::NoMatch);
//! ```
//!
//! # Architecture
//!
//! - [`router`]: the route table and dispatch
//! - [`core`]: routes, the argument binder, shape descriptors, coercion
//! - [`io`]: argument source and help output collaborators
//! - [`error`]: error types

// Public API exports
pub use error::{BoxError, ErrorCategory, ParseError, Result, RouterError};
pub use router::{Dispatched, Router, RouterConfig};

// Core types
pub use crate::core::{Binding, FieldSpec, Scalar, SemanticType, ShapeDescriptor};

// IO collaborators
pub use io::{no_help, os_args, print_help};

pub mod core;
pub mod error;
pub mod io;
pub mod router;
