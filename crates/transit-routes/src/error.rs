//! Route error types

use thiserror::Error;

use crate::route::RouteId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route matches: {0}")]
    NotFound(String),

    #[error("Invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Route declared twice: {0}")]
    DuplicateRoute(RouteId),

    #[error("Route not in table: {0}")]
    UnknownRoute(RouteId),

    #[error("Template for {route} uses undeclared argument: {name}")]
    UnknownArgument { route: RouteId, name: String },

    #[error("Missing value for {route} argument: {name}")]
    MissingArgument { route: RouteId, name: String },
}
