//! Events that drive link state transitions

/// Events observed by the receive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Network join finished (address assigned)
    NetworkJoined,
    /// A datagram arrived, valid or not
    DatagramReceived,
    /// No datagram for longer than the data timeout
    DataTimeout,
}

impl LinkEvent {
    /// Check if this event reflects traffic on the socket
    pub fn is_traffic(&self) -> bool {
        matches!(self, LinkEvent::DatagramReceived)
    }
}
