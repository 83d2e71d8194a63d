//! Glimmer Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the receiver core is
//! written against. Board crates (RP2040, ...) implement them, and the
//! board-agnostic crates stay testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (glimmer-firmware)         │
//! └─────────────────────────────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │  glimmer-core   │     │ glimmer-drivers │
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//!          └───────────┬───────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  glimmer-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                      │
//!                      ▼
//!             ┌─────────────────┐
//!             │  glimmer-hal-   │
//!             │     rp2040      │
//!             └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs driving the panel shift registers
//! - [`surface::MatrixSurface`] - Addressable pixel surface of the LED matrix
//!
//! Plus [`id::DeviceId`], the board's factory-unique identity.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod id;
pub mod surface;

// Re-export key traits at crate root for convenience
pub use gpio::{AddressLines, OutputPin};
pub use id::DeviceId;
pub use surface::{Color565, MatrixSurface};
