//! GPIO pin abstractions
//!
//! Output pins as seen by the panel drivers. Chip-specific HALs implement
//! [`OutputPin`] on top of their own GPIO types.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Emit one rising edge (low → high → low)
    ///
    /// Used for shift-register clocks and latch strobes.
    fn pulse(&mut self) {
        self.set_high();
        self.set_low();
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }
}

/// Row address lines of a multiplexed panel (A, B, C, D, E ...)
///
/// Line 0 carries the least significant address bit.
pub struct AddressLines<P, const N: usize> {
    lines: [P; N],
}

impl<P: OutputPin, const N: usize> AddressLines<P, N> {
    /// Wrap a set of address pins, least significant bit first
    pub fn new(lines: [P; N]) -> Self {
        Self { lines }
    }

    /// Number of distinct rows these lines can select
    pub const fn row_count() -> usize {
        1 << N
    }

    /// Put `row` on the address lines
    ///
    /// Bits above the available lines are ignored.
    pub fn select(&mut self, row: usize) {
        for (bit, line) in self.lines.iter_mut().enumerate() {
            line.set_state(row & (1 << bit) != 0);
        }
    }

    /// Give the pins back
    pub fn release(self) -> [P; N] {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPin {
        high: bool,
        rising_edges: u32,
    }

    impl OutputPin for RecordingPin {
        fn set_high(&mut self) {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    #[test]
    fn test_pulse_leaves_pin_low() {
        let mut pin = RecordingPin::default();
        pin.pulse();
        pin.pulse();
        assert!(!pin.high);
        assert_eq!(pin.rising_edges, 2);
    }

    #[test]
    fn test_address_select() {
        let mut lines = AddressLines::new(core::array::from_fn::<_, 4, _>(|_| RecordingPin::default()));
        lines.select(0b1010);
        let pins = lines.release();
        assert!(!pins[0].high);
        assert!(pins[1].high);
        assert!(!pins[2].high);
        assert!(pins[3].high);
    }

    #[test]
    fn test_row_count() {
        assert_eq!(AddressLines::<RecordingPin, 4>::row_count(), 16);
        assert_eq!(AddressLines::<RecordingPin, 5>::row_count(), 32);
    }
}
