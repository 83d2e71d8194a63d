//! Receiver context
//!
//! Everything the receive loop mutates lives in one [`Receiver`], owned by
//! the loop and handed the surface by `&mut` for each step:
//!
//! ```text
//!  datagram ──► on_datagram ──► link monitor ──► render.enter ──► decode ──► assembler
//!  no data  ──► on_idle     ──► link monitor ──► render.render
//! ```
//!
//! The receiver never blocks and never owns the surface, so the caller
//! decides how long the surface lock is held.

use glimmer_hal::MatrixSurface;
use glimmer_protocol::{decode, DecodeError, Fragment};

use crate::assembler::{FrameAssembler, IngestReport};
use crate::config::ReceiverConfig;
use crate::link::{LinkMonitor, LinkState, Transition};
use crate::render::{Content, NetworkIdentity, RenderCoordinator};

/// Receive statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Datagrams seen, valid or not
    pub datagrams: u32,
    /// Rejected as too short
    pub truncated: u32,
    /// Rejected for a wrong magic
    pub bad_magic: u32,
    /// Fragments applied to the surface
    pub fragments: u32,
    /// Fragments that completed a frame
    pub frames: u32,
}

impl RxStats {
    /// Datagrams rejected by the decoder
    pub fn rejected(&self) -> u32 {
        self.truncated.wrapping_add(self.bad_magic)
    }
}

/// Result of handling one datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DatagramOutcome {
    /// Link state change caused by the arrival
    pub transition: Option<Transition>,
    /// What the fragment did to the surface, or why it was rejected
    pub result: Result<IngestReport, DecodeError>,
}

/// Result of an idle loop pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleOutcome {
    /// Link state change caused by the passage of time
    pub transition: Option<Transition>,
    /// What the surface now shows
    pub content: Content,
}

/// Receive loop context
#[derive(Debug, Clone)]
pub struct Receiver {
    config: ReceiverConfig,
    assembler: FrameAssembler,
    link: LinkMonitor,
    render: RenderCoordinator,
    identity: NetworkIdentity,
    stats: RxStats,
}

impl Receiver {
    /// Create a receiver in the `Offline` state
    pub fn new(config: ReceiverConfig) -> Self {
        let identity = NetworkIdentity::new(&config.hostname, 0);
        Self {
            link: LinkMonitor::new(config.data_timeout_s),
            assembler: FrameAssembler::new(),
            render: RenderCoordinator::new(),
            identity,
            stats: RxStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    pub fn state(&self) -> LinkState {
        self.link.state()
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn link(&self) -> &LinkMonitor {
        &self.link
    }

    pub fn stats(&self) -> &RxStats {
        &self.stats
    }

    /// Network came up with the given identity
    pub fn network_joined(&mut self, identity: NetworkIdentity) -> Option<Transition> {
        self.identity = identity;
        self.link.network_joined()
    }

    /// Handle one received datagram
    ///
    /// The arrival counts as traffic before the datagram is decoded, so
    /// malformed datagrams still keep the stream `Active`.
    pub fn on_datagram<S: MatrixSurface>(
        &mut self,
        datagram: &[u8],
        now_s: u32,
        surface: &mut S,
    ) -> DatagramOutcome {
        self.stats.datagrams = self.stats.datagrams.wrapping_add(1);

        let transition = self.link.datagram_received(now_s);
        self.render.enter(self.link.state(), surface);

        let result = match decode(datagram) {
            Ok(fragment) => Ok(self.apply(&fragment, surface)),
            Err(err) => {
                match err {
                    DecodeError::Truncated => {
                        self.stats.truncated = self.stats.truncated.wrapping_add(1)
                    }
                    DecodeError::BadMagic => {
                        self.stats.bad_magic = self.stats.bad_magic.wrapping_add(1)
                    }
                }
                Err(err)
            }
        };

        DatagramOutcome { transition, result }
    }

    /// Handle a loop pass in which no datagram arrived
    pub fn on_idle<S: MatrixSurface>(&mut self, now_s: u32, surface: &mut S) -> IdleOutcome {
        let transition = self.link.update(now_s);
        let content = self.render.render(
            self.link.state(),
            &self.identity,
            self.assembler.stats().last_frame_size,
            surface,
        );
        IdleOutcome { transition, content }
    }

    fn apply<S: MatrixSurface>(&mut self, fragment: &Fragment<'_>, surface: &mut S) -> IngestReport {
        let report = self.assembler.ingest(fragment, surface);
        self.stats.fragments = self.stats.fragments.wrapping_add(1);

        let header = &fragment.header;
        let placed = header.sequence != 0;
        let last_of_count = header.packet_count != 0 && header.sequence >= header.packet_count;
        let reaches_end = report.offset + fragment.pixel_count() >= surface.pixel_count();
        if placed && (last_of_count || reaches_end) {
            self.stats.frames = self.stats.frames.wrapping_add(1);
        }

        report
    }
}
