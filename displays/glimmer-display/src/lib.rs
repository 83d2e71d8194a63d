//! Frame buffer for Glimmer LED matrix panels
//!
//! Holds the RGB565 pixels the panel refresh scans out, and implements both
//! the receiver-facing [`MatrixSurface`](glimmer_hal::MatrixSurface) and
//! `embedded-graphics`' `DrawTarget` so status text can be rendered with
//! its mono fonts.

#![no_std]
#![deny(unsafe_code)]

pub mod framebuffer;

pub use framebuffer::{FrameBuffer, GLYPH_HEIGHT, GLYPH_WIDTH};
