//! Navigation error types

use thiserror::Error;

use transit_routes::RouteId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Route error: {0}")]
    Route(#[from] transit_routes::RouteError),

    #[error("Route not in table: {0}")]
    UnknownRoute(RouteId),

    #[error("Navigation controller not started")]
    NotStarted,
}
