//! Render coordination
//!
//! Decides, once per receive loop pass, what the surface should hold:
//!
//! ```text
//! Offline ──► boot panel (drawn once)
//! Online  ──► status panel
//! Active  ──► streamed pixels (left alone)
//! Timeout ──► status panel
//! ```
//!
//! Any change of state clears the surface before the next draw, so the
//! status text never bleeds into pixel data and vice versa.

use core::fmt::Write;

use glimmer_hal::{Color565, MatrixSurface};
use heapless::String;

use crate::config::MAX_HOSTNAME_LEN;
use crate::link::LinkState;

/// Longest status line the panel will format
const LINE_LEN: usize = 32;

type Line = String<LINE_LEN>;

/// Status text colours
const TITLE_COLOR: Color565 = Color565::WHITE;
const INFO_COLOR: Color565 = Color565::GREEN;
const ALERT_COLOR: Color565 = Color565::RED;

/// How the receiver is reachable, shown on the status panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkIdentity {
    /// Host name announced over DHCP
    pub hostname: String<MAX_HOSTNAME_LEN>,
    /// Assigned IPv4 address
    pub address: Option<[u8; 4]>,
    /// Per-device identifier (low 24 bits are displayed)
    pub instance_id: u32,
}

impl NetworkIdentity {
    /// Identity with a host name and no address yet
    pub fn new(hostname: &str, instance_id: u32) -> Self {
        let mut name = String::new();
        for c in hostname.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            hostname: name,
            address: None,
            instance_id,
        }
    }
}

/// What a render pass left on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Content {
    /// Boot panel was drawn
    Boot,
    /// Streamed pixels are showing
    Pixels,
    /// Status panel was drawn
    Status,
    /// Nothing was drawn
    Unchanged,
}

/// Render coordinator
#[derive(Debug, Clone, Default)]
pub struct RenderCoordinator {
    /// State the surface currently reflects
    rendered: Option<LinkState>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the surface for `state`
    ///
    /// Clears the surface if it currently reflects a different state.
    /// Returns `true` if it cleared.
    pub fn enter<S: MatrixSurface>(&mut self, state: LinkState, surface: &mut S) -> bool {
        if self.rendered == Some(state) {
            return false;
        }
        surface.clear();
        self.rendered = Some(state);
        true
    }

    /// Render an idle pass (no datagram arrived)
    ///
    /// `last_frame_size` is the frame size of the most recent fragment, 0
    /// before any data.
    pub fn render<S: MatrixSurface>(
        &mut self,
        state: LinkState,
        identity: &NetworkIdentity,
        last_frame_size: u16,
        surface: &mut S,
    ) -> Content {
        let entered = self.enter(state, surface);

        if state.shows_pixels() {
            Content::Pixels
        } else if state.shows_status() {
            draw_status(surface, state, identity, last_frame_size);
            Content::Status
        } else if entered {
            draw_boot(surface);
            Content::Boot
        } else {
            Content::Unchanged
        }
    }
}

fn draw_boot<S: MatrixSurface>(surface: &mut S) {
    let (_, rows) = surface.text_grid();
    let top = rows.saturating_sub(2) / 2;
    surface.draw_text(top, 0, "GLIMMER", TITLE_COLOR);
    surface.draw_text(top + 1, 0, "CONNECTING", INFO_COLOR);
}

fn draw_status<S: MatrixSurface>(
    surface: &mut S,
    state: LinkState,
    identity: &NetworkIdentity,
    last_frame_size: u16,
) {
    let (cols, rows) = surface.text_grid();
    let width = (cols as usize).min(LINE_LEN);

    let mut lines: [(Line, Color565); 5] = Default::default();

    let _ = lines[0].0.push_str(&identity.hostname);
    lines[0].1 = TITLE_COLOR;

    match identity.address {
        Some([a, b, c, d]) => {
            let _ = write!(lines[1].0, "{a}.{b}.{c}.{d}");
        }
        None => {
            let _ = lines[1].0.push_str("NO ADDR");
        }
    }
    lines[1].1 = INFO_COLOR;

    let _ = write!(lines[2].0, "ID {:06X}", identity.instance_id & 0x00FF_FFFF);
    lines[2].1 = INFO_COLOR;

    if last_frame_size > 0 {
        let _ = write!(lines[3].0, "LAST {last_frame_size}B");
    } else {
        let _ = lines[3].0.push_str("LAST -");
    }
    lines[3].1 = INFO_COLOR;

    let _ = lines[4].0.push_str(state.label());
    lines[4].1 = if state == LinkState::Timeout {
        ALERT_COLOR
    } else {
        INFO_COLOR
    };

    for (row, (line, color)) in lines.iter_mut().enumerate().take(rows as usize) {
        fit(line, width);
        surface.draw_text(row as u8, 0, line, *color);
    }
}

/// Truncate or pad with spaces to exactly `width` characters
fn fit(line: &mut Line, width: usize) {
    if line.len() > width {
        line.truncate(width);
    }
    while line.len() < width {
        if line.push(' ').is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::GridSurface;

    fn identity() -> NetworkIdentity {
        let mut identity = NetworkIdentity::new("glimmer", 0x12AB_CDEF);
        identity.address = Some([192, 168, 1, 20]);
        identity
    }

    #[test]
    fn test_offline_boot_panel_drawn_once() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();

        let first = render.render(LinkState::Offline, &identity(), 0, &mut surface);
        let second = render.render(LinkState::Offline, &identity(), 0, &mut surface);

        assert_eq!(first, Content::Boot);
        assert_eq!(second, Content::Unchanged);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.line(2), Some("CONNECTING"));
    }

    #[test]
    fn test_online_status_panel() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();

        let content = render.render(LinkState::Online, &identity(), 0, &mut surface);

        assert_eq!(content, Content::Status);
        assert_eq!(surface.line(0).map(str::trim_end), Some("glimmer"));
        assert_eq!(surface.line(1).map(str::trim_end), Some("192.168.1.20"));
        assert_eq!(surface.line(2).map(str::trim_end), Some("ID ABCDEF"));
        assert_eq!(surface.line(3).map(str::trim_end), Some("LAST -"));
        assert_eq!(surface.line(4).map(str::trim_end), Some("WAITING"));
    }

    #[test]
    fn test_lines_padded_to_grid_width() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();

        render.render(LinkState::Online, &identity(), 0, &mut surface);

        assert_eq!(surface.line(0).map(str::len), Some(16));
    }

    #[test]
    fn test_timeout_shows_last_frame_size() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();

        render.render(LinkState::Timeout, &identity(), 6144, &mut surface);

        assert_eq!(surface.line(3).map(str::trim_end), Some("LAST 6144B"));
        assert_eq!(surface.line(4).map(str::trim_end), Some("TIMEOUT"));
    }

    #[test]
    fn test_missing_address() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();
        let identity = NetworkIdentity::new("glimmer", 1);

        render.render(LinkState::Online, &identity, 0, &mut surface);

        assert_eq!(surface.line(1).map(str::trim_end), Some("NO ADDR"));
    }

    #[test]
    fn test_active_leaves_pixels_alone() {
        let mut surface = GridSurface::<8, 8>::new();
        let mut render = RenderCoordinator::new();
        render.enter(LinkState::Active, &mut surface);
        surface.set_index(3, Color565::RED);

        let content = render.render(LinkState::Active, &identity(), 0, &mut surface);

        assert_eq!(content, Content::Pixels);
        assert_eq!(surface.at(3), Color565::RED);
        assert_eq!(surface.clears, 1);
    }

    #[test]
    fn test_state_change_clears_once() {
        let mut surface = GridSurface::<64, 32>::new();
        let mut render = RenderCoordinator::new();

        render.render(LinkState::Online, &identity(), 0, &mut surface);
        render.render(LinkState::Online, &identity(), 0, &mut surface);
        assert_eq!(surface.clears, 1);

        assert!(render.enter(LinkState::Active, &mut surface));
        assert!(!render.enter(LinkState::Active, &mut surface));
        assert_eq!(surface.clears, 2);

        render.render(LinkState::Timeout, &identity(), 0, &mut surface);
        assert_eq!(surface.clears, 3);
    }

    #[test]
    fn test_small_grid_drops_rows_and_truncates() {
        let mut surface = GridSurface::<16, 12>::new();
        let mut render = RenderCoordinator::new();

        render.render(LinkState::Online, &identity(), 0, &mut surface);

        assert_eq!(surface.text.len(), 2);
        assert_eq!(surface.line(1), Some("192."));
        assert_eq!(surface.line(2), None);
    }

    #[test]
    fn test_hostname_truncated_to_capacity() {
        let long = "a-very-long-host-name-that-does-not-fit-anywhere";
        let identity = NetworkIdentity::new(long, 0);
        assert_eq!(identity.hostname.len(), MAX_HOSTNAME_LEN);
    }
}
