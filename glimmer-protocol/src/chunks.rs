//! Sender-side frame splitting
//!
//! Splits one frame of RGB bytes into fragments the way TPM2.NET senders
//! do: equal-sized chunks, numbered from 1, each declaring its own chunk
//! size in the frame size field. Only the last chunk may be shorter.

use crate::packet::{EncodeError, Fragment, FragmentHeader};
use crate::BYTES_PER_PIXEL;

/// Iterator over the fragments of one frame
#[derive(Debug, Clone)]
pub struct FrameChunks<'a> {
    frame: &'a [u8],
    chunk_len: usize,
    next_sequence: u16,
    total: u8,
}

impl<'a> FrameChunks<'a> {
    /// Split `frame` into fragments of at most `max_payload` bytes
    ///
    /// `max_payload` is rounded down to whole pixels. A trailing partial
    /// triplet in `frame` is dropped.
    pub fn new(frame: &'a [u8], max_payload: usize) -> Result<Self, EncodeError> {
        let chunk_len = max_payload - max_payload % BYTES_PER_PIXEL;
        if chunk_len == 0 {
            return Err(EncodeError::BufferTooSmall);
        }
        if chunk_len > u16::MAX as usize {
            return Err(EncodeError::PayloadTooLarge);
        }

        let frame = &frame[..frame.len() - frame.len() % BYTES_PER_PIXEL];
        let total = frame.len().div_ceil(chunk_len);
        let total = u8::try_from(total).map_err(|_| EncodeError::TooManyFragments)?;

        Ok(Self {
            frame,
            chunk_len,
            next_sequence: 1,
            total,
        })
    }

    /// Number of fragments the frame splits into
    pub fn fragment_count(&self) -> u8 {
        self.total
    }
}

impl<'a> Iterator for FrameChunks<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_sequence > u16::from(self.total) {
            return None;
        }
        let start = (self.next_sequence as usize - 1) * self.chunk_len;
        let end = (start + self.chunk_len).min(self.frame.len());
        let payload = &self.frame[start..end];

        let header = FragmentHeader {
            // chunk_len is checked against u16::MAX in new()
            frame_size: payload.len() as u16,
            // bounded by total, which fits a u8
            sequence: self.next_sequence as u8,
            packet_count: self.total,
        };
        self.next_sequence += 1;
        Some(Fragment::new(header, payload))
    }
}
