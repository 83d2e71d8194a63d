//! Receiver configuration
//!
//! Defaults reproduce the stock 64×32 panel listening on the TPM2.NET port.
//! Boards override them from a TOML file, see [`toml`].

pub mod toml;

pub use self::toml::{entries, parse_config, Entry, ParseError};

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glimmer_protocol::{BYTES_PER_PIXEL, TPM2_NET_PORT};

/// Maximum hostname length accepted by DHCP option 12 in this firmware
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Default panel width in pixels
pub const DEFAULT_WIDTH: u16 = 64;

/// Default panel height in pixels
pub const DEFAULT_HEIGHT: u16 = 32;

/// Seconds without a datagram before an active stream counts as lost
pub const DATA_TIMEOUT_S: u32 = 2;

/// Panel refresh rate (full bit-plane scans per second)
pub const REFRESH_HZ: u32 = 512;

/// How long the receive loop waits for a datagram before an idle pass
pub const IDLE_POLL_MS: u32 = 20;

/// Hostname announced when none is configured
pub const DEFAULT_HOSTNAME: &str = "glimmer";

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    EmptyMatrix,
    /// More pixels than a 16-bit frame size can describe
    MatrixTooLarge,
    /// Refresh rate is zero
    InvalidRefreshRate,
    /// Hostname is empty or too long
    InvalidHostname,
}

/// Receiver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverConfig {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// UDP port to listen on
    pub port: u16,
    /// Stream timeout in seconds
    pub data_timeout_s: u32,
    /// Panel refresh rate in Hz
    pub refresh_hz: u32,
    /// Receive poll interval in milliseconds
    pub idle_poll_ms: u32,
    /// Hostname requested from DHCP and shown on the status panel
    pub hostname: String<MAX_HOSTNAME_LEN>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        let mut hostname = String::new();
        let _ = hostname.push_str(DEFAULT_HOSTNAME);
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            port: TPM2_NET_PORT,
            data_timeout_s: DATA_TIMEOUT_S,
            refresh_hz: REFRESH_HZ,
            idle_poll_ms: IDLE_POLL_MS,
            hostname,
        }
    }
}

impl ReceiverConfig {
    /// Number of pixels on the panel
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Largest frame size in bytes a sender should declare
    pub fn max_frame_size(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }

    /// Refresh period in microseconds
    pub fn refresh_period_us(&self) -> u64 {
        1_000_000 / self.refresh_hz.max(1) as u64
    }

    /// Replace the hostname, rejecting empty or oversized names
    pub fn set_hostname(&mut self, name: &str) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::InvalidHostname);
        }
        let mut hostname = String::new();
        hostname
            .push_str(name)
            .map_err(|_| ConfigError::InvalidHostname)?;
        self.hostname = hostname;
        Ok(())
    }

    /// Check the configuration for values the receiver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        if self.max_frame_size() > u16::MAX as usize {
            return Err(ConfigError::MatrixTooLarge);
        }
        if self.refresh_hz == 0 {
            return Err(ConfigError::InvalidRefreshRate);
        }
        if self.hostname.is_empty() {
            return Err(ConfigError::InvalidHostname);
        }
        Ok(())
    }
}
