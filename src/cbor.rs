//! Minimal byte-string framing: a length-prefix header in one of four size
//! classes, immediately followed by the raw payload.
//!
//! This is the byte-string subset of CBOR the UR wire format uses, with one
//! deliberate deviation: the four-byte length class is introduced by `0x60`
//! rather than the standard `0x5a`. The format is bit-exact and therefore
//! hand-rolled here instead of delegated to a CBOR library.
//!
//! ```
//! use bc32ur::cbor::{frame, unframe};
//! let framed = frame(b"Hello world").unwrap();
//! assert_eq!(framed[0], 0x40 + 11);
//! assert_eq!(unframe(&framed).unwrap(), b"Hello world");
//! ```

extern crate alloc;
use alloc::vec::Vec;

/// Largest payload length the five-byte header class can carry.
const MAX_LENGTH: u64 = u32::MAX as u64;

/// The different errors that can be returned when framing or unframing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Payload length is zero or exceeds the largest header class.
    LengthOverflow,
    /// The first byte doesn't introduce any known header class.
    InvalidHeader,
    /// The input ends before the header (or any payload byte) is complete.
    UnexpectedEnd,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LengthOverflow => write!(f, "payload length outside the supported range"),
            Self::InvalidHeader => write!(f, "invalid framing header"),
            Self::UnexpectedEnd => write!(f, "truncated frame"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Produces the length header for a payload of `length` bytes.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] for a zero length or one above
/// 4,294,967,295.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_header(length: u64) -> Result<Vec<u8>, Error> {
    match length {
        1..=23 => Ok([0x40 + length as u8].to_vec()),
        24..=255 => Ok([0x58, length as u8].to_vec()),
        256..=65535 => Ok([0x59, (length >> 8) as u8, length as u8].to_vec()),
        65536..=MAX_LENGTH => {
            let b = (length as u32).to_be_bytes();
            Ok([0x60, b[0], b[1], b[2], b[3]].to_vec())
        }
        _ => Err(Error::LengthOverflow),
    }
}

/// Prefixes `payload` with its length header.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] for an empty or oversized payload.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>, Error> {
    let mut framed = encode_header(payload.len() as u64)?;
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// Strips the length header off a framed byte string and returns the
/// payload.
///
/// # Errors
///
/// Returns [`Error::InvalidHeader`] if the first byte selects no header
/// class and [`Error::UnexpectedEnd`] if the input is shorter than the
/// header it declares.
pub fn unframe(data: &[u8]) -> Result<Vec<u8>, Error> {
    let first = *data.first().ok_or(Error::UnexpectedEnd)?;
    let header_length = match first {
        0x00..=0x57 => 1,
        0x58 => 2,
        0x59 => 3,
        0x60 => 5,
        _ => return Err(Error::InvalidHeader),
    };
    if data.len() <= header_length {
        return Err(Error::UnexpectedEnd);
    }
    Ok(data[header_length..].to_vec())
}
