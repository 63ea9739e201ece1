//! Route matching and argument binding
//!
//! - `route`: typed routes and the type-erased `Route` trait the router stores
//! - `binder`: the option, then positional, binding phases
//! - `scanner`: the `-key value` option scanner
//! - `shape`: payload shape descriptors built from serde
//! - `value`: semantic types and token coercion
//! - `walker`: field discovery through a recording `serde::Serializer`

pub mod binder;
pub mod route;
pub mod scanner;
pub mod shape;
pub mod value;
pub mod walker;

pub use binder::{ArgumentBinder, Bound};
pub use route::{Outcome, Route, TypedRoute};
pub use scanner::{scan_options, OptionScan};
pub use shape::{Binding, FieldSpec, PayloadBuilder, ShapeDescriptor};
pub use value::{Scalar, SemanticType};
