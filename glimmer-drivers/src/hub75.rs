//! HUB75 panel driver
//!
//! Bit-banged scanner for 1/N scan HUB75 panels. The panel is driven as two
//! halves that share the address lines: while row `y` is selected, the upper
//! data lines (R1 G1 B1) carry row `y` and the lower lines (R2 G2 B2) carry
//! row `y + H/2`.
//!
//! Colour depth comes from binary code modulation. Each call to
//! [`Hub75::refresh`] scans every row pair for one bit plane and then moves
//! to the next plane; plane `p` stays lit for `base_on_time_us << p`, so a
//! full cycle of planes weights each bit by its significance.
//!
//! ```text
//! per row pair:  shift W columns (CLK) ─► OE off ─► select row ─► LAT ─► OE on ─► hold
//! ```

use embedded_hal::delay::DelayNs;
use glimmer_hal::{AddressLines, Color565, MatrixSurface, OutputPin};

/// Most bit planes a channel can use (8-bit expanded colour)
pub const MAX_BIT_PLANES: u8 = 8;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hub75Error {
    /// Bit plane count outside 1..=8
    InvalidBitPlanes,
    /// On-time of the most significant plane overflows
    InvalidOnTime,
}

/// Scan timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hub75Config {
    /// Bit planes per channel, taken from the most significant bits
    pub bit_planes: u8,
    /// Lit time of the least significant plane (microseconds)
    pub base_on_time_us: u32,
}

impl Default for Hub75Config {
    fn default() -> Self {
        Self {
            bit_planes: 4,
            base_on_time_us: 1,
        }
    }
}

impl Hub75Config {
    /// Check the configuration
    pub fn validate(&self) -> Result<(), Hub75Error> {
        if self.bit_planes == 0 || self.bit_planes > MAX_BIT_PLANES {
            return Err(Hub75Error::InvalidBitPlanes);
        }
        self.base_on_time_us
            .checked_shl(u32::from(self.bit_planes - 1))
            .filter(|t| t >> (self.bit_planes - 1) == self.base_on_time_us)
            .ok_or(Hub75Error::InvalidOnTime)?;
        Ok(())
    }

    /// Lit time of bit plane `plane`
    pub fn on_time_us(&self, plane: u8) -> u32 {
        self.base_on_time_us << plane
    }
}

/// Pins of one HUB75 connector
///
/// `A` is the number of address lines (4 for 1/16 scan, 5 for 1/32).
pub struct Hub75Pins<P, const A: usize> {
    pub r1: P,
    pub g1: P,
    pub b1: P,
    pub r2: P,
    pub g2: P,
    pub b2: P,
    pub address: AddressLines<P, A>,
    pub clk: P,
    pub lat: P,
    /// Output enable, active low
    pub oe: P,
}

/// HUB75 scanner
pub struct Hub75<P, D, const A: usize> {
    pins: Hub75Pins<P, A>,
    delay: D,
    config: Hub75Config,
    /// Bit plane the next refresh scans
    plane: u8,
}

impl<P: OutputPin, D: DelayNs, const A: usize> Hub75<P, D, A> {
    /// Create a scanner with the panel blanked
    pub fn new(pins: Hub75Pins<P, A>, delay: D, config: Hub75Config) -> Result<Self, Hub75Error> {
        config.validate()?;

        let mut driver = Self {
            pins,
            delay,
            config,
            plane: 0,
        };
        driver.pins.oe.set_high();
        driver.pins.lat.set_low();
        driver.pins.clk.set_low();
        Ok(driver)
    }

    /// Bit plane the next refresh will scan
    pub fn plane(&self) -> u8 {
        self.plane
    }

    /// Row pairs scanned for a surface of the given height
    pub fn row_pairs(height: u16) -> usize {
        (height as usize / 2).min(AddressLines::<P, A>::row_count())
    }

    /// Scan one bit plane of `surface` onto the panel
    ///
    /// Leaves the panel blanked when done.
    pub fn refresh<S: MatrixSurface + ?Sized>(&mut self, surface: &S) {
        let (width, height) = surface.dimensions();
        let half = Self::row_pairs(height);
        let bit = MAX_BIT_PLANES - self.config.bit_planes + self.plane;
        let on_time = self.config.on_time_us(self.plane);

        for y in 0..half {
            for x in 0..width {
                let upper = surface.pixel(x, y as u16).unwrap_or(Color565::BLACK);
                let lower = surface
                    .pixel(x, (y + half) as u16)
                    .unwrap_or(Color565::BLACK);
                self.shift(upper, lower, bit);
            }

            self.pins.oe.set_high();
            self.pins.address.select(y);
            self.pins.lat.pulse();
            self.pins.oe.set_low();
            self.delay.delay_us(on_time);
        }
        self.pins.oe.set_high();

        self.plane = (self.plane + 1) % self.config.bit_planes;
    }

    fn shift(&mut self, upper: Color565, lower: Color565, bit: u8) {
        let pins = &mut self.pins;
        pins.r1.set_state(upper.red8() >> bit & 1 != 0);
        pins.g1.set_state(upper.green8() >> bit & 1 != 0);
        pins.b1.set_state(upper.blue8() >> bit & 1 != 0);
        pins.r2.set_state(lower.red8() >> bit & 1 != 0);
        pins.g2.set_state(lower.green8() >> bit & 1 != 0);
        pins.b2.set_state(lower.blue8() >> bit & 1 != 0);
        pins.clk.pulse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_display::FrameBuffer;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Line {
        R1,
        G1,
        B1,
        R2,
        G2,
        B2,
        A(usize),
        Clk,
        Lat,
        Oe,
    }

    /// Shared view of every line, sampled on clock and latch edges
    #[derive(Default)]
    struct Bus {
        data: [bool; 6],
        address: usize,
        oe_high: bool,
        /// RGB1 RGB2 at each clock rising edge
        clocked: Vec<[bool; 6]>,
        /// Address and blanking at each latch rising edge
        latched: Vec<(usize, bool)>,
        /// Clock edges seen while the panel was lit
        clocked_while_lit: usize,
    }

    struct MockPin {
        line: Line,
        bus: Rc<RefCell<Bus>>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            let mut bus = self.bus.borrow_mut();
            match self.line {
                Line::Clk => {
                    let sample = bus.data;
                    bus.clocked.push(sample);
                    if !bus.oe_high {
                        bus.clocked_while_lit += 1;
                    }
                }
                Line::Lat => {
                    let sample = (bus.address, bus.oe_high);
                    bus.latched.push(sample);
                }
                Line::Oe => bus.oe_high = true,
                Line::A(bit) => bus.address |= 1 << bit,
                data => bus.data[data_index(data)] = true,
            }
        }

        fn set_low(&mut self) {
            let mut bus = self.bus.borrow_mut();
            match self.line {
                Line::Clk | Line::Lat => {}
                Line::Oe => bus.oe_high = false,
                Line::A(bit) => bus.address &= !(1 << bit),
                data => bus.data[data_index(data)] = false,
            }
        }
    }

    fn data_index(line: Line) -> usize {
        match line {
            Line::R1 => 0,
            Line::G1 => 1,
            Line::B1 => 2,
            Line::R2 => 3,
            Line::G2 => 4,
            Line::B2 => 5,
            _ => unreachable!(),
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: Rc<RefCell<u64>>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            *self.total_ns.borrow_mut() += u64::from(ns);
        }
    }

    struct Rig {
        driver: Hub75<MockPin, MockDelay, 4>,
        bus: Rc<RefCell<Bus>>,
        waited_ns: Rc<RefCell<u64>>,
    }

    fn rig(config: Hub75Config) -> Rig {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |line| MockPin {
            line,
            bus: bus.clone(),
        };
        let pins = Hub75Pins {
            r1: pin(Line::R1),
            g1: pin(Line::G1),
            b1: pin(Line::B1),
            r2: pin(Line::R2),
            g2: pin(Line::G2),
            b2: pin(Line::B2),
            address: AddressLines::new([
                pin(Line::A(0)),
                pin(Line::A(1)),
                pin(Line::A(2)),
                pin(Line::A(3)),
            ]),
            clk: pin(Line::Clk),
            lat: pin(Line::Lat),
            oe: pin(Line::Oe),
        };
        let delay = MockDelay::default();
        let waited_ns = delay.total_ns.clone();
        let driver = Hub75::new(pins, delay, config).unwrap();
        Rig {
            driver,
            bus,
            waited_ns,
        }
    }

    #[test]
    fn test_config_validation() {
        let bad = |bit_planes, base_on_time_us| {
            Hub75Config {
                bit_planes,
                base_on_time_us,
            }
            .validate()
        };
        assert_eq!(bad(0, 1), Err(Hub75Error::InvalidBitPlanes));
        assert_eq!(bad(9, 1), Err(Hub75Error::InvalidBitPlanes));
        assert_eq!(bad(8, u32::MAX), Err(Hub75Error::InvalidOnTime));
        assert_eq!(bad(8, 1), Ok(()));
        assert_eq!(Hub75Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_starts_blanked() {
        let rig = rig(Hub75Config::default());
        assert!(rig.bus.borrow().oe_high);
        assert_eq!(rig.driver.plane(), 0);
    }

    #[test]
    fn test_refresh_scans_every_row_pair() {
        let mut rig = rig(Hub75Config::default());
        let fb = FrameBuffer::<64, 32>::new();

        rig.driver.refresh(&fb);

        let bus = rig.bus.borrow();
        assert_eq!(bus.clocked.len(), 64 * 16);
        let rows: Vec<usize> = bus.latched.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, (0..16).collect::<Vec<_>>());
        assert!(bus.latched.iter().all(|(_, blanked)| *blanked));
        assert_eq!(bus.clocked_while_lit, 64 * 15);
        assert!(bus.oe_high);
    }

    #[test]
    fn test_halves_map_to_upper_and_lower_lines() {
        let mut rig = rig(Hub75Config {
            bit_planes: 1,
            base_on_time_us: 1,
        });
        let mut fb = FrameBuffer::<64, 32>::new();
        fb.set_pixel(0, 0, Color565::RED);
        fb.set_pixel(1, 16, Color565::BLUE);

        rig.driver.refresh(&fb);

        let bus = rig.bus.borrow();
        assert_eq!(bus.clocked[0], [true, false, false, false, false, false]);
        assert_eq!(bus.clocked[1], [false, false, false, false, false, true]);
        assert!(bus.clocked[2..].iter().all(|s| s.iter().all(|b| !b)));
    }

    #[test]
    fn test_planes_follow_bit_significance() {
        let mut rig = rig(Hub75Config {
            bit_planes: 8,
            base_on_time_us: 1,
        });
        let mut fb = FrameBuffer::<64, 32>::new();
        // red8 = 0b1000_0100 (0x84)
        fb.set_pixel(0, 0, Color565::from_rgb888(0x84, 0, 0));

        let mut red_by_plane = Vec::new();
        for _ in 0..8 {
            let start = rig.bus.borrow().clocked.len();
            rig.driver.refresh(&fb);
            red_by_plane.push(rig.bus.borrow().clocked[start][0]);
        }

        assert_eq!(
            red_by_plane,
            [false, false, true, false, false, false, false, true]
        );
        assert_eq!(rig.driver.plane(), 0);
    }

    #[test]
    fn test_on_time_doubles_per_plane() {
        let mut rig = rig(Hub75Config {
            bit_planes: 3,
            base_on_time_us: 2,
        });
        let fb = FrameBuffer::<64, 32>::new();

        let mut per_plane = Vec::new();
        for _ in 0..3 {
            let before = *rig.waited_ns.borrow();
            rig.driver.refresh(&fb);
            per_plane.push(*rig.waited_ns.borrow() - before);
        }

        assert_eq!(per_plane, [16 * 2_000, 16 * 4_000, 16 * 8_000]);
    }

    #[test]
    fn test_row_pairs_limited_by_address_lines() {
        assert_eq!(Hub75::<MockPin, MockDelay, 4>::row_pairs(32), 16);
        assert_eq!(Hub75::<MockPin, MockDelay, 4>::row_pairs(64), 16);
        assert_eq!(Hub75::<MockPin, MockDelay, 5>::row_pairs(64), 32);
        assert_eq!(Hub75::<MockPin, MockDelay, 4>::row_pairs(16), 8);
    }
}
