//! GPIO outputs

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;

/// Push-pull output implementing [`glimmer_hal::OutputPin`]
pub struct Pin<'d> {
    output: Output<'d>,
}

impl<'d> Pin<'d> {
    /// Configure `pin` as an output starting low
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self::with_level(pin, Level::Low)
    }

    /// Configure `pin` as an output starting at `level`
    pub fn with_level(pin: Peri<'d, AnyPin>, level: Level) -> Self {
        Self {
            output: Output::new(pin, level),
        }
    }
}

impl glimmer_hal::OutputPin for Pin<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }

    fn set_state(&mut self, high: bool) {
        self.output.set_level(if high { Level::High } else { Level::Low });
    }
}
