//! Encode and decode byte payloads according to the `bc32` scheme, a
//! base-32 text codec with a six-symbol BCH checksum suffix.
//!
//! The scheme reuses the bech32 alphabet and generator polynomial but omits
//! the human-readable part and separator, making it suitable for dense QR
//! code payloads.
//!
//! ```
//! use bc32ur::bc32::{decode, encode};
//! let encoded = encode(b"Hello world").unwrap();
//! assert_eq!(encoded, "fpjkcmr0ypmk7unvvsh4ra4j");
//! assert_eq!(decode(&encoded).unwrap(), b"Hello world");
//! ```

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

/// The 32-character alphabet, indexed by 5-bit symbol value.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup from alphabet character (either case) to symbol value.
static CHARSET_REV: phf::Map<u8, u8> = phf::phf_map! {
    b'0' => 15, b'2' => 10, b'3' => 17, b'4' => 21, b'5' => 20, b'6' => 26,
    b'7' => 30, b'8' => 7, b'9' => 5,
    b'a' => 29, b'c' => 24, b'd' => 13, b'e' => 25, b'f' => 9, b'g' => 8,
    b'h' => 23, b'j' => 18, b'k' => 22, b'l' => 31, b'm' => 27, b'n' => 19,
    b'p' => 1, b'q' => 0, b'r' => 3, b's' => 16, b't' => 11, b'u' => 28,
    b'v' => 12, b'w' => 14, b'x' => 6, b'y' => 4, b'z' => 2,
    b'A' => 29, b'C' => 24, b'D' => 13, b'E' => 25, b'F' => 9, b'G' => 8,
    b'H' => 23, b'J' => 18, b'K' => 22, b'L' => 31, b'M' => 27, b'N' => 19,
    b'P' => 1, b'Q' => 0, b'R' => 3, b'S' => 16, b'T' => 11, b'U' => 28,
    b'V' => 12, b'W' => 14, b'X' => 6, b'Y' => 4, b'Z' => 2,
};

const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

/// Residue a valid symbol sequence must leave after the polynomial run.
const TARGET_RESIDUE: u32 = 0x3fff_ffff;

const CHECKSUM_LENGTH: usize = 6;

/// The different errors that can be returned when encoding or decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A character outside the printable ASCII range or the alphabet.
    InvalidChar,
    /// Upper- and lowercase alphabet characters mixed in one string.
    MixedCase,
    /// The BCH checksum doesn't validate.
    InvalidChecksum,
    /// Empty payload, or a symbol sequence shorter than its checksum.
    InvalidLength,
    /// Symbols don't realign to whole bytes.
    Bits(crate::bits::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidChar => write!(f, "invalid character"),
            Self::MixedCase => write!(f, "mixed-case string"),
            Self::InvalidChecksum => write!(f, "invalid checksum"),
            Self::InvalidLength => write!(f, "invalid length"),
            Self::Bits(e) => write!(f, "invalid symbols: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<crate::bits::Error> for Error {
    fn from(e: crate::bits::Error) -> Self {
        Self::Bits(e)
    }
}

fn polymod(values: &[u8]) -> u32 {
    let mut c: u32 = 1;
    for &v in values {
        let c0 = c >> 25;
        c = ((c & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= g;
            }
        }
    }
    c
}

/// The polynomial runs over a zero sentinel symbol followed by the payload
/// symbols; for checksum creation six zero placeholders stand in for the
/// checksum itself.
fn create_checksum(symbols: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let mut enc = Vec::with_capacity(symbols.len() + 1 + CHECKSUM_LENGTH);
    enc.push(0);
    enc.extend_from_slice(symbols);
    enc.extend_from_slice(&[0; CHECKSUM_LENGTH]);
    let m = polymod(&enc) ^ TARGET_RESIDUE;
    #[allow(clippy::cast_possible_truncation)]
    core::array::from_fn(|i| ((m >> (5 * (5 - i))) & 31) as u8)
}

fn verify_checksum(symbols: &[u8]) -> bool {
    let mut enc = Vec::with_capacity(symbols.len() + 1);
    enc.push(0);
    enc.extend_from_slice(symbols);
    polymod(&enc) == TARGET_RESIDUE
}

/// Encodes a byte payload into a checksummed `bc32` string.
///
/// # Examples
///
/// ```
/// assert_eq!(bc32ur::bc32::encode(&[0]).unwrap(), "qqwnf95j");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] for an empty payload, the only input
/// this protocol doesn't represent.
pub fn encode(data: &[u8]) -> Result<String, Error> {
    let mut symbols = crate::bits::convert_bits(data, 8, 5, true)?;
    if symbols.is_empty() {
        return Err(Error::InvalidLength);
    }
    symbols.extend_from_slice(&create_checksum(&symbols));
    Ok(symbols
        .iter()
        .map(|&s| char::from(CHARSET[usize::from(s)]))
        .collect())
}

/// Decodes a `bc32` string back into a byte payload.
///
/// Either case is accepted, but not both in the same string. The checksum
/// is verified before any byte realignment takes place.
///
/// # Examples
///
/// ```
/// use bc32ur::bc32::decode;
/// assert_eq!(decode("qqwnf95j").unwrap(), vec![0]);
/// assert_eq!(decode("QQWNF95J").unwrap(), vec![0]);
/// ```
///
/// # Errors
///
/// Returns a distinct [`Error`] for out-of-alphabet characters, mixed case,
/// a checksum mismatch, misaligned padding bits, or an empty payload. An
/// empty payload is never reported as success.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Error> {
    let mut lower = false;
    let mut upper = false;
    for &b in encoded.as_bytes() {
        if b.is_ascii_lowercase() {
            lower = true;
        } else if b.is_ascii_uppercase() {
            upper = true;
        } else if !(33..=126).contains(&b) {
            return Err(Error::InvalidChar);
        }
    }
    if lower && upper {
        return Err(Error::MixedCase);
    }

    let symbols = encoded
        .as_bytes()
        .iter()
        .map(|b| CHARSET_REV.get(b).copied())
        .collect::<Option<Vec<u8>>>()
        .ok_or(Error::InvalidChar)?;

    if symbols.len() < CHECKSUM_LENGTH {
        return Err(Error::InvalidLength);
    }
    if !verify_checksum(&symbols) {
        return Err(Error::InvalidChecksum);
    }
    let data = crate::bits::convert_bits(&symbols[..symbols.len() - CHECKSUM_LENGTH], 5, 8, false)?;
    if data.is_empty() {
        // valid checksum over zero payload symbols, which encode never emits
        return Err(Error::InvalidLength);
    }
    Ok(data)
}
