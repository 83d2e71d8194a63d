//! Board wiring
//!
//! RP2040 with a W5500 Ethernet controller on SPI0 (W5500-EVB-Pico layout)
//! and a HUB75 connector on GPIO 0-14:
//!
//! | Signal        | GPIO |
//! |---------------|------|
//! | R1 G1 B1      | 0 1 2 |
//! | R2 G2 B2      | 3 4 5 |
//! | A B C D E     | 6 7 8 9 10 |
//! | CLK LAT OE    | 11 12 13 |
//! | W5500 MISO    | 16 |
//! | W5500 CS      | 17 |
//! | W5500 SCK     | 18 |
//! | W5500 MOSI    | 19 |
//! | W5500 RST     | 20 |
//! | W5500 INT     | 21 |

use embassy_rp::gpio::{AnyPin, Level};
use embassy_rp::Peri;
use embassy_time::Delay;
use glimmer_drivers::{Hub75, Hub75Config, Hub75Error, Hub75Pins};
use glimmer_hal::AddressLines;
use glimmer_hal_rp2040::Pin;

/// HUB75 address lines (A-E, 1/32 scan)
pub const ADDRESS_LINES: usize = 5;

/// Panel driver as wired on this board
pub type PanelDriver = Hub75<Pin<'static>, Delay, ADDRESS_LINES>;

/// HUB75 connector pins, in table order
pub struct Hub75Gpio {
    pub data: [Peri<'static, AnyPin>; 6],
    pub address: [Peri<'static, AnyPin>; ADDRESS_LINES],
    pub clk: Peri<'static, AnyPin>,
    pub lat: Peri<'static, AnyPin>,
    pub oe: Peri<'static, AnyPin>,
}

impl Hub75Gpio {
    /// Configure the pins and build the scanner
    pub fn into_driver(self, config: Hub75Config) -> Result<PanelDriver, Hub75Error> {
        let [r1, g1, b1, r2, g2, b2] = self.data.map(Pin::new);
        let pins = Hub75Pins {
            r1,
            g1,
            b1,
            r2,
            g2,
            b2,
            address: AddressLines::new(self.address.map(Pin::new)),
            clk: Pin::new(self.clk),
            lat: Pin::new(self.lat),
            // Blanked until the first scan
            oe: Pin::with_level(self.oe, Level::High),
        };
        Hub75::new(pins, Delay, config)
    }
}
