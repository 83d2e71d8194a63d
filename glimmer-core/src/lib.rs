//! Board-agnostic receive pipeline for the LED matrix firmware
//!
//! This crate contains everything between "a datagram arrived" and "these
//! pixels are on the surface", independent of the network stack and the
//! panel hardware:
//!
//! - Frame assembly from TPM2.NET fragments
//! - Link state machine (Offline / Online / Active / Timeout)
//! - Render coordination (pixel data vs. status panel)
//! - Receiver context tying the above together
//! - Configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod config;
pub mod link;
pub mod receiver;
pub mod render;

#[cfg(test)]
mod testing;

pub use assembler::{AssemblerStats, FrameAssembler, IngestReport};
pub use config::{ConfigError, ParseError, ReceiverConfig};
pub use link::{LinkEvent, LinkMonitor, LinkState, Transition};
pub use receiver::{DatagramOutcome, IdleOutcome, Receiver, RxStats};
pub use render::{Content, NetworkIdentity, RenderCoordinator};
