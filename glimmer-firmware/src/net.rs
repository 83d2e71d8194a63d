//! Network bring-up
//!
//! W5500 in MACRAW mode under `embassy-net`, address from DHCP. Any
//! failure here is fatal: the caller halts instead of retrying.

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Stack, StackResources};
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner, State};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::{with_timeout, Delay, Duration, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use glimmer_core::ReceiverConfig;
use glimmer_hal::DeviceId;
use heapless::String;
use static_cell::StaticCell;

use crate::tasks;

/// How long DHCP may take before the network counts as down
const JOIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Sockets the stack has room for (UDP + DHCP)
const SOCKETS: usize = 3;

pub type EthernetSpi = ExclusiveDevice<Spi<'static, SPI0, Async>, Output<'static>, Delay>;
pub type EthernetRunner = Runner<'static, W5500, EthernetSpi, Input<'static>, Output<'static>>;

/// Network bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum NetError {
    /// Chip select could not be driven
    ChipSelect,
    /// W5500 did not answer during init
    Chip,
    /// Task pool exhausted
    Spawn,
    /// No DHCP lease within the join timeout
    DhcpTimeout,
}

/// Everything the W5500 needs
pub struct EthernetParts {
    pub spi: Spi<'static, SPI0, Async>,
    pub cs: Output<'static>,
    pub int: Input<'static>,
    pub reset: Output<'static>,
}

/// Bring the network up and wait for an address
pub async fn join(
    spawner: &Spawner,
    parts: EthernetParts,
    id: DeviceId,
    config: &ReceiverConfig,
) -> Result<(Stack<'static>, [u8; 4]), NetError> {
    let mac = id.mac_address();
    info!("Ethernet MAC {=[u8]:02x}", mac);

    let spi = ExclusiveDevice::new(parts.spi, parts.cs, Delay).map_err(|_| NetError::ChipSelect)?;

    static STATE: StaticCell<State<8, 8>> = StaticCell::new();
    let state = STATE.init(State::<8, 8>::new());
    let (device, runner) = embassy_net_wiznet::new(mac, state, spi, parts.int, parts.reset)
        .await
        .map_err(|_| NetError::Chip)?;
    spawner
        .spawn(tasks::ethernet_task(runner))
        .map_err(|_| NetError::Spawn)?;

    let mut dhcp = embassy_net::DhcpConfig::default();
    let mut hostname = String::new();
    // Both are bounded by MAX_HOSTNAME_LEN
    let _ = hostname.push_str(&config.hostname);
    dhcp.hostname = Some(hostname);

    static RESOURCES: StaticCell<StackResources<SOCKETS>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        device,
        embassy_net::Config::dhcpv4(dhcp),
        RESOURCES.init(StackResources::new()),
        seed(id),
    );
    spawner
        .spawn(tasks::net_task(runner))
        .map_err(|_| NetError::Spawn)?;

    info!("Waiting for DHCP lease...");
    with_timeout(JOIN_TIMEOUT, stack.wait_config_up())
        .await
        .map_err(|_| NetError::DhcpTimeout)?;

    let address = stack
        .config_v4()
        .map(|cfg| cfg.address.address().octets())
        .ok_or(NetError::DhcpTimeout)?;
    info!(
        "Network up: {}.{}.{}.{}",
        address[0], address[1], address[2], address[3]
    );

    Ok((stack, address))
}

/// Stack RNG seed from the board ID and boot timing
fn seed(id: DeviceId) -> u64 {
    u64::from_be_bytes(id.0) ^ Instant::now().as_ticks().rotate_left(32)
}

pub type NetDevice = Device<'static>;
