//! Transit Route Table
//!
//! Declares the navigation graph:
//! - Screen identifiers and their path templates (`form?five={five}`)
//! - Declared arguments with optional defaults
//! - External deep-link patterns mapping onto the same route
//!
//! Resolution tries deep links first, in declaration order, then falls
//! back to in-app path templates.

mod args;
mod error;
mod pattern;
mod route;
mod table;

pub use args::RouteArgs;
pub use error::RouteError;
pub use pattern::UriPattern;
pub use route::{ArgSpec, Route, RouteId, StateScope};
pub use table::{MatchSource, Resolution, RouteTable, RouteTableBuilder, DEFAULT_SCHEME};

pub type Result<T> = std::result::Result<T, RouteError>;
