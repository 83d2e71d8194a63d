//! Link monitor
//!
//! Owns the link state and the last-packet timestamp, and turns the
//! passage of time into [`LinkEvent::DataTimeout`].

use super::events::LinkEvent;
use super::machine::{LinkState, Transition};
use crate::config::DATA_TIMEOUT_S;

/// Link monitor
///
/// Timestamps are whole seconds from a monotonic clock.
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: LinkState,
    /// Arrival second of the most recent datagram
    last_packet_s: u32,
    /// Silence longer than this ends an active stream
    timeout_s: u32,
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new(DATA_TIMEOUT_S)
    }
}

impl LinkMonitor {
    /// Create a monitor in the `Offline` state
    pub fn new(timeout_s: u32) -> Self {
        Self {
            state: LinkState::Offline,
            last_packet_s: 0,
            timeout_s,
        }
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Arrival second of the last datagram
    pub fn last_packet_s(&self) -> u32 {
        self.last_packet_s
    }

    /// Seconds since the last datagram
    pub fn silence_s(&self, now_s: u32) -> u32 {
        now_s.saturating_sub(self.last_packet_s)
    }

    /// Feed an event through the transition table
    ///
    /// Returns the transition if the state changed.
    pub fn apply(&mut self, event: LinkEvent) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        self.state = to;
        (from != to).then_some(Transition { from, to })
    }

    /// Network join completed
    pub fn network_joined(&mut self) -> Option<Transition> {
        self.apply(LinkEvent::NetworkJoined)
    }

    /// Record a datagram arrival
    ///
    /// Called before the datagram is decoded, so rejected datagrams keep
    /// the stream alive too.
    pub fn datagram_received(&mut self, now_s: u32) -> Option<Transition> {
        self.last_packet_s = now_s;
        self.apply(LinkEvent::DatagramReceived)
    }

    /// Check the data timeout
    ///
    /// Called once per receive loop pass.
    pub fn update(&mut self, now_s: u32) -> Option<Transition> {
        if self.state == LinkState::Active && self.silence_s(now_s) > self.timeout_s {
            return self.apply(LinkEvent::DataTimeout);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online() -> LinkMonitor {
        let mut monitor = LinkMonitor::default();
        monitor.network_joined();
        monitor
    }

    #[test]
    fn test_starts_offline() {
        let mut monitor = LinkMonitor::default();
        assert_eq!(monitor.state(), LinkState::Offline);
        assert_eq!(
            monitor.network_joined(),
            Some(Transition {
                from: LinkState::Offline,
                to: LinkState::Online
            })
        );
        assert_eq!(monitor.network_joined(), None);
    }

    #[test]
    fn test_online_stays_online_without_traffic() {
        let mut monitor = online();
        for now in 0..10 {
            assert_eq!(monitor.update(now), None);
        }
        assert_eq!(monitor.state(), LinkState::Online);
    }

    #[test]
    fn test_datagram_activates() {
        let mut monitor = online();
        let transition = monitor.datagram_received(5).unwrap();
        assert_eq!(transition.to, LinkState::Active);
        assert_eq!(monitor.last_packet_s(), 5);

        // Further datagrams are not a transition
        assert_eq!(monitor.datagram_received(6), None);
    }

    #[test]
    fn test_timeout_is_strictly_greater() {
        let mut monitor = online();
        monitor.datagram_received(10);

        assert_eq!(monitor.update(11), None);
        assert_eq!(monitor.update(12), None);
        assert_eq!(monitor.state(), LinkState::Active);

        let transition = monitor.update(13).unwrap();
        assert_eq!(transition.from, LinkState::Active);
        assert_eq!(transition.to, LinkState::Timeout);
    }

    #[test]
    fn test_timeout_then_resume() {
        let mut monitor = online();
        monitor.datagram_received(0);
        monitor.update(3);
        assert_eq!(monitor.state(), LinkState::Timeout);

        // Still in Timeout while quiet
        assert_eq!(monitor.update(30), None);

        let transition = monitor.datagram_received(31).unwrap();
        assert_eq!(transition.from, LinkState::Timeout);
        assert_eq!(transition.to, LinkState::Active);
    }

    #[test]
    fn test_traffic_while_offline_is_recorded() {
        let mut monitor = LinkMonitor::default();
        assert_eq!(monitor.datagram_received(4), None);
        assert_eq!(monitor.state(), LinkState::Offline);
        assert_eq!(monitor.last_packet_s(), 4);
    }

    #[test]
    fn test_custom_timeout() {
        let mut monitor = LinkMonitor::new(5);
        monitor.network_joined();
        monitor.datagram_received(0);
        assert_eq!(monitor.update(5), None);
        assert!(monitor.update(6).is_some());
    }
}
