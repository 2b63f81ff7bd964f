//! Lossless repacking of fixed-width values into a different fixed width.
//!
//! The bc32 codec stores byte payloads as 5-bit alphabet symbols. Going from
//! 8-bit to 5-bit units the trailing bits are zero-padded; going back they
//! must realign to whole bytes, so that truncated or corrupted symbol
//! sequences are rejected instead of silently losing data.
//!
//! ```
//! use bc32ur::bits::convert_bits;
//! let symbols = convert_bits(&[0xff], 8, 5, true).unwrap();
//! assert_eq!(symbols, vec![31, 28]);
//! assert_eq!(convert_bits(&symbols, 5, 8, false).unwrap(), vec![0xff]);
//! ```

extern crate alloc;
use alloc::vec::Vec;

/// The two different errors that can be returned when repacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An input value doesn't fit within the source bit width.
    InvalidValue,
    /// The input doesn't tile into whole output units with zero fill.
    InvalidPadding,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidValue => write!(f, "value exceeds the source bit width"),
            Self::InvalidPadding => write!(f, "invalid padding bits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Reinterprets `data` as a continuous bitstream of `from`-bit units and
/// re-slices it into `to`-bit units.
///
/// With `pad` set, bits remaining after the last full output unit are
/// flushed left-justified with zero fill. Without it, leftover bits must be
/// fewer than `from` and all zero.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] if any input value has bits set above
/// `from`, and [`Error::InvalidPadding`] if `pad` is unset and the input
/// doesn't realign to whole output units.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Error> {
    let maxv: u32 = (1 << to) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret: Vec<u8> = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return Err(Error::InvalidValue);
        }
        acc = (acc << from) | v;
        bits += from;
        while bits >= to {
            bits -= to;
            #[allow(clippy::cast_possible_truncation)]
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }

    if pad {
        if bits > 0 {
            #[allow(clippy::cast_possible_truncation)]
            ret.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(Error::InvalidPadding);
    }
    Ok(ret)
}
