//! Link state machine
//!
//! Tracks whether the network is up and whether a pixel stream is flowing.
//! The transition table is pure; [`LinkMonitor`] feeds it with events
//! derived from datagram arrival times.

pub mod events;
pub mod machine;
pub mod monitor;

pub use events::LinkEvent;
pub use machine::{LinkState, Transition};
pub use monitor::LinkMonitor;
