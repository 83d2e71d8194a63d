//! Embassy async tasks
//!
//! The receive task and the refresh task share the frame buffer through
//! [`crate::frame::with_frame`]; the network tasks only drive the stack.

pub mod net;
pub mod receive;
pub mod refresh;

pub use net::{ethernet_task, net_task};
pub use receive::receive_task;
pub use refresh::refresh_task;
