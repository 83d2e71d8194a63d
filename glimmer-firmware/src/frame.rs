//! Shared frame buffer
//!
//! The receive task writes fragments and status text, the refresh task
//! scans it out. Both go through [`with_frame`]; the lock is a critical
//! section, so every holder keeps it for one bounded step: one fragment,
//! one status panel or one bit plane.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use glimmer_display::FrameBuffer;

include!(concat!(env!("OUT_DIR"), "/panel.rs"));

/// Frame buffer sized for the configured panel
pub type Panel = FrameBuffer<PANEL_WIDTH, PANEL_HEIGHT>;

static FRAME: Mutex<CriticalSectionRawMutex, RefCell<Panel>> =
    Mutex::new(RefCell::new(Panel::new()));

/// Run `f` with exclusive access to the frame buffer
pub fn with_frame<R>(f: impl FnOnce(&mut Panel) -> R) -> R {
    FRAME.lock(|frame| f(&mut frame.borrow_mut()))
}
