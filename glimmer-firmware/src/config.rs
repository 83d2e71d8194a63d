//! Configuration loading
//!
//! `glimmer.toml` is compiled into the firmware and was validated by the
//! build script, so parsing only fails if the file and the reader drift
//! apart. In that case the defaults are used.

use defmt::*;

use glimmer_core::config::{entries, parse_config, ParseError};
use glimmer_core::ReceiverConfig;
use glimmer_drivers::{Hub75Config, Hub75Error};

use crate::frame::{PANEL_HEIGHT, PANEL_WIDTH};

/// Embedded configuration (compiled into firmware)
/// Edit glimmer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../glimmer.toml");

/// Everything the firmware reads from glimmer.toml
pub struct FirmwareConfig {
    pub receiver: ReceiverConfig,
    pub panel: Hub75Config,
}

/// Load the embedded configuration, falling back to defaults
pub fn load() -> FirmwareConfig {
    let mut receiver = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default receiver configuration");
            ReceiverConfig::default()
        }
    };

    // The frame buffer is sized at build time
    if usize::from(receiver.width) != PANEL_WIDTH || usize::from(receiver.height) != PANEL_HEIGHT {
        warn!(
            "Configured matrix {}x{} differs from frame buffer {}x{}, using the latter",
            receiver.width, receiver.height, PANEL_WIDTH, PANEL_HEIGHT
        );
        receiver.width = PANEL_WIDTH as u16;
        receiver.height = PANEL_HEIGHT as u16;
    }

    let panel = match parse_panel(EMBEDDED_CONFIG) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Failed to parse [panel]: {}", e);
            Hub75Config::default()
        }
    };

    info!(
        "Config: {}x{} port={} timeout={}s refresh={}Hz planes={}",
        receiver.width,
        receiver.height,
        receiver.port,
        receiver.data_timeout_s,
        receiver.refresh_hz,
        panel.bit_planes
    );
    debug!("Hostname: {}", receiver.hostname.as_str());

    FirmwareConfig { receiver, panel }
}

/// Errors reading the `[panel]` section
#[derive(Debug, Clone, Copy, Format)]
enum PanelError {
    Parse(ParseError),
    Invalid(Hub75Error),
}

impl From<ParseError> for PanelError {
    fn from(e: ParseError) -> Self {
        PanelError::Parse(e)
    }
}

/// Read the `[panel]` section
fn parse_panel(input: &str) -> Result<Hub75Config, PanelError> {
    let mut panel = Hub75Config::default();

    for entry in entries(input) {
        let entry = entry?;
        match (entry.section, entry.key) {
            ("panel", "bit_planes") => panel.bit_planes = entry.int()?,
            ("panel", "base_on_time_us") => panel.base_on_time_us = entry.int()?,
            ("panel", _) => return Err(ParseError::UnknownKey { line: entry.line }.into()),
            _ => {}
        }
    }

    panel.validate().map_err(PanelError::Invalid)?;
    Ok(panel)
}
