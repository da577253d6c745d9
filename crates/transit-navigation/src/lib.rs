//! Transit Navigation
//!
//! Owns the back stack and mediates every transition:
//! - `navigate_to` pushes a frame, `navigate_back` pops one
//! - The stack never shrinks below the start frame
//! - State holders are scoped per frame or per application, as the
//!   route table declares
//! - Listeners run synchronously after each transition

mod controller;
mod error;
mod frame;

pub use controller::{ListenerId, NavController, NavEvent, Transition};
pub use error::NavigationError;
pub use frame::{Frame, FrameId};

pub type Result<T> = std::result::Result<T, NavigationError>;
