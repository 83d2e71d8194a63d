//! Network stack runners

use embassy_net::Runner;

use crate::net::{EthernetRunner, NetDevice};

/// Moves frames between the W5500 and the stack
#[embassy_executor::task]
pub async fn ethernet_task(runner: EthernetRunner) -> ! {
    runner.run().await
}

/// Runs the IP stack (DHCP, UDP)
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, NetDevice>) -> ! {
    runner.run().await
}
