//! Frame assembly
//!
//! Places the RGB payload of each fragment onto the matrix surface.
//!
//! Fragment placement is keyed off the largest frame size seen in the
//! session (the high-water mark), not the fragment's own declared size:
//!
//! ```text
//! pixel_offset = max_frame_size * (sequence - 1) / 3
//! ```
//!
//! Senders split a frame into equal chunks and declare the chunk size in
//! the frame size field, so a shorter last chunk still lands after its
//! full-size predecessors. The mark never shrinks. If a sender switches to
//! smaller chunks mid-session, later fragments are placed against the old,
//! larger stride until [`FrameAssembler::reset`] is called.
//!
//! Sequence numbers are 1-based. A fragment numbered 0 has no place in the
//! frame: it still raises the mark, but all of its pixels are discarded.

use glimmer_hal::{Color565, MatrixSurface};
use glimmer_protocol::{Fragment, BYTES_PER_PIXEL};

/// Result of applying one fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestReport {
    /// Linear index of the first pixel of this fragment
    pub offset: usize,
    /// Pixels written to the surface
    pub written: usize,
    /// Pixels dropped because they fell outside the surface
    pub discarded: usize,
}

/// Running assembly statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssemblerStats {
    /// Fragments applied
    pub fragments: u32,
    /// Pixels written
    pub pixels_written: u32,
    /// Pixels dropped at the surface edge
    pub pixels_discarded: u32,
    /// Frame size declared by the most recent fragment
    pub last_frame_size: u16,
}

/// Frame assembler
#[derive(Debug, Clone, Default)]
pub struct FrameAssembler {
    /// Largest frame size seen this session (bytes)
    max_frame_size: u16,
    stats: AssemblerStats,
}

impl FrameAssembler {
    /// Create an assembler with an empty high-water mark
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest frame size seen this session, in bytes
    pub fn max_frame_size(&self) -> u16 {
        self.max_frame_size
    }

    /// Linear index where fragment `sequence` starts
    ///
    /// `None` for sequence 0, which lies before the start of the frame.
    pub fn pixel_offset(&self, sequence: u8) -> Option<usize> {
        let step = usize::from(sequence).checked_sub(1)?;
        Some(self.max_frame_size as usize * step / BYTES_PER_PIXEL)
    }

    /// Running statistics
    pub fn stats(&self) -> &AssemblerStats {
        &self.stats
    }

    /// Forget the high-water mark and statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a fragment to the surface
    ///
    /// Pixels whose index falls outside the surface are dropped one by one;
    /// the rest of the fragment is still applied. A fragment without a valid
    /// offset is dropped whole and reports offset 0.
    pub fn ingest<S: MatrixSurface>(&mut self, fragment: &Fragment<'_>, surface: &mut S) -> IngestReport {
        self.max_frame_size = self.max_frame_size.max(fragment.header.frame_size);

        let mut report = IngestReport::default();
        match self.pixel_offset(fragment.header.sequence) {
            Some(offset) => {
                report.offset = offset;
                for (i, [r, g, b]) in fragment.pixels().enumerate() {
                    if surface.set_index(offset + i, Color565::from_rgb888(r, g, b)) {
                        report.written += 1;
                    } else {
                        report.discarded += 1;
                    }
                }
            }
            None => report.discarded = fragment.pixel_count(),
        }

        self.stats.fragments = self.stats.fragments.wrapping_add(1);
        self.stats.pixels_written = self.stats.pixels_written.wrapping_add(report.written as u32);
        self.stats.pixels_discarded = self
            .stats
            .pixels_discarded
            .wrapping_add(report.discarded as u32);
        self.stats.last_frame_size = fragment.header.frame_size;

        report
    }
}
