//! Panel refresh task
//!
//! Scans one bit plane per tick, independent of the link state.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::PanelDriver;
use crate::frame::with_frame;

/// Refresh task - drives the panel from the frame buffer
#[embassy_executor::task]
pub async fn refresh_task(mut panel: PanelDriver, period: Duration) {
    info!("Refresh task started ({}us period)", period.as_micros());

    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        with_frame(|frame| panel.refresh(frame));
    }
}
