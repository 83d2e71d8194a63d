//! Glimmer - TPM2.NET LED Matrix Receiver Firmware
//!
//! Receives pixel frames as TPM2.NET datagrams over Ethernet and shows them
//! on a HUB75 LED matrix. While no stream is running the panel shows how
//! to reach the receiver (host name, address, instance ID).
//!
//! Named for the faint, flickering light of a panel waiting for its
//! next frame.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::{Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use glimmer_core::{NetworkIdentity, Receiver};
use glimmer_hal::DeviceId;
use glimmer_hal_rp2040::read_device_id;

use crate::board::Hub75Gpio;
use crate::frame::with_frame;
use crate::net::EthernetParts;

mod board;
mod config;
mod frame;
mod net;
mod tasks;

/// W5500 SPI clock
const SPI_FREQUENCY_HZ: u32 = 50_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glimmer firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    let id = read_device_id(p.FLASH).unwrap_or_else(|| {
        warn!("No flash unique ID, using a fixed board ID");
        DeviceId([0; 8])
    });
    info!("Instance {:06x}", id.instance_id() & 0x00FF_FFFF);

    // Panel first, so the boot panel shows while the network comes up
    let hub75 = Hub75Gpio {
        data: [
            p.PIN_0.into(),
            p.PIN_1.into(),
            p.PIN_2.into(),
            p.PIN_3.into(),
            p.PIN_4.into(),
            p.PIN_5.into(),
        ],
        address: [
            p.PIN_6.into(),
            p.PIN_7.into(),
            p.PIN_8.into(),
            p.PIN_9.into(),
            p.PIN_10.into(),
        ],
        clk: p.PIN_11.into(),
        lat: p.PIN_12.into(),
        oe: p.PIN_13.into(),
    };
    let panel = match hub75.into_driver(config.panel) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Invalid panel timing: {}", e);
            halt().await
        }
    };

    let period = Duration::from_micros(config.receiver.refresh_period_us());
    spawner.spawn(tasks::refresh_task(panel, period)).unwrap();

    let mut receiver = Receiver::new(config.receiver);
    with_frame(|frame| {
        receiver.on_idle(uptime_s(), frame);
        debug!("Boot panel drawn: {}", frame);
    });

    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let ethernet = EthernetParts {
        spi: Spi::new(
            p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, p.DMA_CH0, p.DMA_CH1, spi_config,
        ),
        cs: Output::new(p.PIN_17, Level::High),
        int: Input::new(p.PIN_21, Pull::Up),
        reset: Output::new(p.PIN_20, Level::High),
    };

    let (stack, address) = match net::join(&spawner, ethernet, id, receiver.config()).await {
        Ok(joined) => joined,
        Err(e) => {
            error!("Network bring-up failed: {}", e);
            halt().await
        }
    };

    let mut identity = NetworkIdentity::new(&receiver.config().hostname, id.instance_id());
    identity.address = Some(address);
    if let Some(t) = receiver.network_joined(identity) {
        info!("Link {} -> {}", t.from, t.to);
    }

    spawner
        .spawn(tasks::receive_task(stack, receiver))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Whole seconds since boot
pub fn uptime_s() -> u32 {
    Instant::now().as_secs() as u32
}

/// Stop for good after a fatal startup error
///
/// The refresh task keeps running, so whatever is on the panel stays lit.
pub async fn halt() -> ! {
    error!("Halted");
    loop {
        Timer::after_secs(3600).await;
    }
}
