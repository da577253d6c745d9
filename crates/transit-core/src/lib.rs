//! Transit Core
//!
//! Coordination layer: owns the navigation controller, wires the Home and
//! Form screens to their state holders, and feeds an ordered queue of user
//! intents through to the renderer.
//! The renderer only ever sees plain [`Screen`] data.

mod app;
mod config;
mod error;
mod screen;

pub use app::{App, AppSnapshot, Outcome};
pub use config::Config;
pub use error::CoreError;
pub use screen::{screen_for, Intent, RecordingRenderer, Renderer, Screen};

// Re-export core components
pub use transit_navigation::{Frame, FrameId, NavController, NavEvent, NavigationError, Transition};
pub use transit_routes::{
    ArgSpec, MatchSource, Resolution, Route, RouteArgs, RouteError, RouteId, RouteTable,
    StateScope, DEFAULT_SCHEME,
};
pub use transit_state::CounterHolder;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
