//! Receive task
//!
//! Owns the UDP socket and the [`Receiver`]. Each pass either handles one
//! datagram or, when none arrives within the poll interval, runs an idle
//! pass (timeout check and status panel).

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use glimmer_core::{DatagramOutcome, IdleOutcome, Receiver};

use crate::frame::with_frame;
use crate::{halt, uptime_s};

/// Largest UDP payload in one Ethernet frame
const MAX_DATAGRAM: usize = 1472;

/// Datagrams the socket can queue
const RX_QUEUE: usize = 8;

/// Seconds between statistics logs
const STATS_INTERVAL_S: u32 = 10;

/// Receive task - socket in, frame buffer out
#[embassy_executor::task]
pub async fn receive_task(stack: Stack<'static>, mut receiver: Receiver) {
    let port = receiver.config().port;
    let poll = Duration::from_millis(u64::from(receiver.config().idle_poll_ms));

    let mut rx_meta = [PacketMetadata::EMPTY; RX_QUEUE];
    let mut rx_buffer = [0u8; MAX_DATAGRAM * RX_QUEUE];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; 0];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(port) {
        error!("UDP bind on port {} failed: {}", port, e);
        halt().await;
    }
    info!("Listening for TPM2.NET on UDP {}", port);

    let mut datagram = [0u8; MAX_DATAGRAM];
    let mut next_stats_s = uptime_s() + STATS_INTERVAL_S;

    loop {
        match select(socket.recv_from(&mut datagram), Timer::after(poll)).await {
            Either::First(Ok((len, meta))) => {
                let outcome =
                    with_frame(|frame| receiver.on_datagram(&datagram[..len], uptime_s(), frame));
                log_datagram(&outcome, len, &meta.endpoint);
            }
            Either::First(Err(e)) => {
                // Larger than the buffer and dropped by the stack; the
                // arrival still counts as traffic
                warn!("UDP receive error: {}", e);
                let outcome = with_frame(|frame| receiver.on_datagram(&[], uptime_s(), frame));
                if let Some(t) = outcome.transition {
                    info!("Link {} -> {}", t.from, t.to);
                }
            }
            Either::Second(()) => {
                let outcome = with_frame(|frame| receiver.on_idle(uptime_s(), frame));
                log_idle(&outcome);
            }
        }

        if uptime_s() >= next_stats_s {
            next_stats_s = uptime_s() + STATS_INTERVAL_S;
            let stats = receiver.stats();
            debug!(
                "rx: {} datagrams, {} fragments, {} frames, {} rejected, state {}",
                stats.datagrams,
                stats.fragments,
                stats.frames,
                stats.rejected(),
                receiver.state()
            );
        }
    }
}

fn log_datagram(outcome: &DatagramOutcome, len: usize, from: &embassy_net::IpEndpoint) {
    if let Some(t) = outcome.transition {
        info!("Link {} -> {} (datagram from {})", t.from, t.to, from);
    }
    match outcome.result {
        Ok(report) => trace!(
            "{} bytes: offset {} wrote {} dropped {}",
            len,
            report.offset,
            report.written,
            report.discarded
        ),
        Err(e) => trace!("{} bytes from {} rejected: {}", len, from, e),
    }
}

fn log_idle(outcome: &IdleOutcome) {
    if let Some(t) = outcome.transition {
        info!("Link {} -> {}", t.from, t.to);
    }
}
