//! Transit State Holders
//!
//! Screen-scoped view state. Each holder owns a single counter that only
//! moves forward and notifies its observers after every change.

mod counter;

pub use counter::{CounterHolder, SubscriptionId};
