//! Back stack frames

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use transit_routes::{RouteArgs, RouteId};

/// Identity of one pushed frame. Pushing the same route twice yields two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(Uuid);

impl FrameId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub route: RouteId,
    /// Bound arguments, defaults already applied
    pub args: RouteArgs,
    /// When the frame was pushed
    pub created_at: DateTime<Utc>,
}

impl Frame {
    pub(crate) fn new(route: RouteId, args: RouteArgs) -> Self {
        Self {
            id: FrameId::new(),
            route,
            args,
            created_at: Utc::now(),
        }
    }
}
