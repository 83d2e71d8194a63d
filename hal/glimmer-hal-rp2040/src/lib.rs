//! RP2040-specific HAL for the LED matrix firmware
//!
//! Implementations of the shared `glimmer-hal` traits on top of
//! `embassy-rp`:
//!
//! - Push-pull outputs for the HUB75 connector
//! - Board identity from the flash chip's unique ID

#![no_std]

pub mod gpio;
pub mod id;

pub use gpio::Pin;
pub use id::read_device_id;
