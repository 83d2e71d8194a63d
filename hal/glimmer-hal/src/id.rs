//! Board identity
//!
//! Boards expose a factory-programmed unique ID (flash serial, eFuse MAC,
//! ...). The receiver shows a short form of it on the status panel and the
//! Ethernet driver needs a MAC address; both are derived here so every
//! board derives them the same way.

/// Factory-unique board identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub [u8; 8]);

impl DeviceId {
    /// 32-bit instance identifier
    ///
    /// XOR of the two halves, so IDs that differ only in the high bytes
    /// still differ here.
    pub fn instance_id(&self) -> u32 {
        let [a, b, c, d, e, f, g, h] = self.0;
        u32::from_be_bytes([a, b, c, d]) ^ u32::from_be_bytes([e, f, g, h])
    }

    /// Locally administered unicast MAC address
    pub fn mac_address(&self) -> [u8; 6] {
        let id = self.instance_id().to_be_bytes();
        [0x02, self.0[3], id[0], id[1], id[2], id[3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_folds_halves() {
        let id = DeviceId([0, 0, 0, 0, 0x12, 0x34, 0x56, 0x78]);
        assert_eq!(id.instance_id(), 0x1234_5678);

        let id = DeviceId([0xFF, 0, 0, 0, 0xFF, 0, 0, 1]);
        assert_eq!(id.instance_id(), 1);
    }

    #[test]
    fn test_mac_is_local_unicast() {
        let mac = DeviceId([1, 2, 3, 4, 5, 6, 7, 8]).mac_address();
        assert_eq!(mac[0] & 0x01, 0);
        assert_eq!(mac[0] & 0x02, 0x02);
    }

    #[test]
    fn test_distinct_ids_distinct_macs() {
        let a = DeviceId([0, 0, 0, 0, 0, 0, 0, 1]).mac_address();
        let b = DeviceId([0, 0, 0, 0, 0, 0, 0, 2]).mac_address();
        assert_ne!(a, b);
    }
}
