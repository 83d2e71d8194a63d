//! Datagram decoding and encoding
//!
//! Header format:
//! - MAGIC (2 bytes): 0x9C 0xDA
//! - FRAME SIZE (2 bytes, big-endian): RGB byte count the sender declares
//! - SEQUENCE (1 byte): 1-based fragment number
//! - RESERVED (1 byte): packet count on most senders, not used for placement
//! - PAYLOAD: RGB triplets

/// Protocol marker at the start of every datagram
pub const MAGIC: [u8; 2] = [0x9C, 0xDA];

/// Full header length; the payload starts here
pub const HEADER_LEN: usize = 6;

/// Shortest datagram that still carries magic, frame size and sequence
pub const MIN_LEN: usize = 5;

const BYTES_PER_PIXEL: usize = crate::BYTES_PER_PIXEL;

/// Reasons a datagram is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Shorter than the minimum header
    Truncated,
    /// First two bytes are not the protocol marker
    BadMagic,
}

/// Errors while building a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer cannot hold header and payload
    BufferTooSmall,
    /// Payload does not fit the 16-bit frame size field
    PayloadTooLarge,
    /// Frame needs more fragments than the sequence byte can number
    TooManyFragments,
}

/// Fixed header fields of one fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FragmentHeader {
    /// Declared RGB byte count
    pub frame_size: u16,
    /// 1-based fragment number
    pub sequence: u8,
    /// Reserved byte (0 when the datagram stops before it)
    pub packet_count: u8,
}

impl FragmentHeader {
    /// Create a header for a single-fragment frame
    pub const fn new(frame_size: u16) -> Self {
        Self {
            frame_size,
            sequence: 1,
            packet_count: 1,
        }
    }

    /// Whole pixels covered by the declared frame size
    pub const fn declared_pixels(&self) -> usize {
        self.frame_size as usize / BYTES_PER_PIXEL
    }

    /// Write the header into `buffer`
    ///
    /// Returns the number of bytes written (always [`HEADER_LEN`]).
    pub fn write_to(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        if buffer.len() < HEADER_LEN {
            return Err(EncodeError::BufferTooSmall);
        }
        let size = self.frame_size.to_be_bytes();
        buffer[0] = MAGIC[0];
        buffer[1] = MAGIC[1];
        buffer[2] = size[0];
        buffer[3] = size[1];
        buffer[4] = self.sequence;
        buffer[5] = self.packet_count;
        Ok(HEADER_LEN)
    }
}

/// One decoded datagram: header plus the RGB bytes it actually carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub header: FragmentHeader,
    /// Whole RGB triplets present after the header
    pub payload: &'a [u8],
}

impl<'a> Fragment<'a> {
    /// Pair a header with a payload
    ///
    /// A trailing partial triplet is dropped.
    pub fn new(header: FragmentHeader, payload: &'a [u8]) -> Self {
        let whole = payload.len() - payload.len() % BYTES_PER_PIXEL;
        Self {
            header,
            payload: &payload[..whole],
        }
    }

    /// Parse a datagram
    pub fn parse(datagram: &'a [u8]) -> Result<Self, DecodeError> {
        if datagram.len() < MIN_LEN {
            return Err(DecodeError::Truncated);
        }
        if datagram[..2] != MAGIC {
            return Err(DecodeError::BadMagic);
        }

        let header = FragmentHeader {
            frame_size: u16::from_be_bytes([datagram[2], datagram[3]]),
            sequence: datagram[4],
            packet_count: datagram.get(5).copied().unwrap_or(0),
        };
        let payload = datagram.get(HEADER_LEN..).unwrap_or(&[]);

        Ok(Self::new(header, payload))
    }

    /// Pixels to place: the declared count, bounded by what arrived
    pub fn pixel_count(&self) -> usize {
        self.header
            .declared_pixels()
            .min(self.payload.len() / BYTES_PER_PIXEL)
    }

    /// RGB triplets to place, in order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        let payload: &'a [u8] = self.payload;
        payload
            .chunks_exact(BYTES_PER_PIXEL)
            .take(self.pixel_count())
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
    }

    /// Total datagram length when encoded
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Encode this fragment into `buffer`
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(EncodeError::BufferTooSmall);
        }
        self.header.write_to(buffer)?;
        buffer[HEADER_LEN..len].copy_from_slice(self.payload);
        Ok(len)
    }
}

/// Decode one datagram
///
/// Pure parse: no state is touched, so callers can record the arrival
/// before deciding what to do with the result.
pub fn decode(datagram: &[u8]) -> Result<Fragment<'_>, DecodeError> {
    Fragment::parse(datagram)
}
