//! Link state definition
//!
//! What the panel shows is a function of the current link state.

use super::events::LinkEvent;

/// Link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Network not joined yet
    Offline,
    /// Address assigned, no datagram seen yet
    Online,
    /// Datagrams are arriving
    Active,
    /// Stream went quiet after being active
    Timeout,
}

/// A state change, reported for logging and redraw decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: LinkState,
    pub to: LinkState,
}

impl LinkState {
    /// Check if the panel should show streamed pixels
    pub fn shows_pixels(&self) -> bool {
        matches!(self, LinkState::Active)
    }

    /// Check if the panel should show the status panel
    pub fn shows_status(&self) -> bool {
        matches!(self, LinkState::Online | LinkState::Timeout)
    }

    /// Short label for the status panel and logs
    pub fn label(&self) -> &'static str {
        match self {
            LinkState::Offline => "OFFLINE",
            LinkState::Online => "WAITING",
            LinkState::Active => "ACTIVE",
            LinkState::Timeout => "TIMEOUT",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (Offline, NetworkJoined) => Online,

            // Any datagram counts, decodable or not
            (Online, DatagramReceived) => Active,
            (Active, DatagramReceived) => Active,
            (Timeout, DatagramReceived) => Active,

            // Only a stream that was flowing can time out
            (Active, DataTimeout) => Timeout,

            // Default: stay in current state
            _ => self,
        }
    }
}
