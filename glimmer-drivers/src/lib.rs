//! Panel driver implementations
//!
//! Concrete drivers that scan a [`MatrixSurface`](glimmer_hal::MatrixSurface)
//! out to LED hardware:
//!
//! - HUB75 shift-register panels with binary code modulation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod hub75;

pub use hub75::{Hub75, Hub75Config, Hub75Error, Hub75Pins};
