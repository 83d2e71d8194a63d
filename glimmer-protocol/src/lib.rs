//! TPM2.NET pixel stream protocol
//!
//! This crate decodes the datagrams a TPM2.NET sender (Jinx!, glediator,
//! xLights, ...) emits towards an LED matrix. One logical frame of RGB data
//! is split over one or more datagrams; each datagram carries a fixed
//! header and a run of RGB triplets.
//!
//! # Datagram Layout
//!
//! ```text
//! ┌────────┬────────────┬──────────┬──────────┬──────────────────┐
//! │ MAGIC  │ FRAME SIZE │ SEQUENCE │ RESERVED │ RGB PAYLOAD      │
//! │ 2B     │ 2B (BE)    │ 1B       │ 1B       │ 3B per pixel     │
//! └────────┴────────────┴──────────┴──────────┴──────────────────┘
//! ```
//!
//! Decoding is a pure function of the datagram bytes; placement of the
//! payload on the matrix is the receiver's job.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod chunks;
pub mod packet;

pub use chunks::FrameChunks;
pub use packet::{
    decode, DecodeError, EncodeError, Fragment, FragmentHeader, HEADER_LEN, MAGIC, MIN_LEN,
};

/// Well-known UDP port for TPM2.NET
pub const TPM2_NET_PORT: u16 = 65506;

/// Bytes per RGB pixel on the wire
pub const BYTES_PER_PIXEL: usize = 3;
