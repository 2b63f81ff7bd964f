//! Assemble byte payloads into `ur:` workload strings and reassemble them.
//!
//! A payload is framed, bc32-encoded and, when it exceeds the fragment
//! length, split into indexed fragments that all carry the bc32-encoded
//! SHA-256 digest of the framed bytes. Reassembly is all-or-nothing: the
//! complete set of fragments is handed over in one call and every declared
//! total, index and digest must agree before any bytes are produced.
//!
//! ```
//! let payload = b"Some binary data".repeat(100);
//! let workloads = bc32ur::ur::encode(&payload, 200).unwrap();
//! assert!(workloads.len() > 1);
//! assert_eq!(bc32ur::ur::decode(&workloads, "bytes").unwrap(), payload);
//! ```

extern crate alloc;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Fragment length used by callers that have no channel-specific limit.
pub const DEFAULT_FRAGMENT_LENGTH: usize = 200;

/// The different errors that can be returned when decoding workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No workloads, a fragment length of zero, or a slash piece count
    /// outside the supported forms.
    InvalidWorkload,
    /// The workload doesn't start with `ur:<type>` for the expected type.
    InvalidScheme,
    /// The `<index>of<total>` token doesn't parse.
    InvalidSequence,
    /// A declared index lies outside `1..=total`.
    IndexOutOfBounds,
    /// Two workloads declare the same index.
    DuplicateIndex,
    /// An index in `1..=total` was never supplied. With the total checked
    /// against the workload count and duplicates rejected, every slot ends
    /// up filled; this backstops the slot fill instead of panicking.
    MissingIndex,
    /// A declared total disagrees with the number of supplied workloads.
    TotalMismatch,
    /// Workloads declare different digests.
    InconsistentDigest,
    /// The recomputed hash disagrees with the declared digest.
    DigestMismatch,
    /// The fragment body isn't valid bc32.
    Bc32(crate::bc32::Error),
    /// The decoded bytes aren't a valid frame.
    Cbor(crate::cbor::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidWorkload => write!(f, "invalid workload"),
            Self::InvalidScheme => write!(f, "invalid UR scheme or type"),
            Self::InvalidSequence => write!(f, "invalid sequence token"),
            Self::IndexOutOfBounds => write!(f, "fragment index out of bounds"),
            Self::DuplicateIndex => write!(f, "duplicate fragment index"),
            Self::MissingIndex => write!(f, "missing fragment index"),
            Self::TotalMismatch => write!(f, "declared total disagrees with workload count"),
            Self::InconsistentDigest => write!(f, "digest differs between workloads"),
            Self::DigestMismatch => write!(f, "digest doesn't match the payload"),
            Self::Bc32(e) => write!(f, "invalid fragment body: {e}"),
            Self::Cbor(e) => write!(f, "invalid frame: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<crate::bc32::Error> for Error {
    fn from(e: crate::bc32::Error) -> Self {
        Self::Bc32(e)
    }
}

impl From<crate::cbor::Error> for Error {
    fn from(e: crate::cbor::Error) -> Self {
        Self::Cbor(e)
    }
}

/// Encodes a payload into one or more `ur:bytes` workload strings.
///
/// A payload whose bc32 encoding fits within `fragment_length` characters
/// yields a single `ur:bytes/<fragment>` workload. Larger payloads yield
/// `ur:bytes/<index>of<total>/<digest>/<fragment>` workloads sharing one
/// digest.
///
/// # Examples
///
/// ```
/// let workloads = bc32ur::ur::encode(b"Hello world", 200).unwrap();
/// assert_eq!(workloads, vec!["ur:bytes/fdyx2mrvdus8wmmjd3jq7hmkxr"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidWorkload`] for a zero fragment length and
/// propagates framing and bc32 errors for unsupported payload sizes.
pub fn encode(payload: &[u8], fragment_length: usize) -> Result<Vec<String>, Error> {
    if fragment_length == 0 {
        return Err(Error::InvalidWorkload);
    }
    let framed = crate::cbor::frame(payload)?;
    let body = crate::bc32::encode(&framed)?;
    if body.len() <= fragment_length {
        return Ok(vec![format!("ur:bytes/{body}")]);
    }

    let digest = crate::bc32::encode(&crate::sha256(&framed))?;
    // bc32 strings are pure ASCII, so splitting at any byte offset is safe
    let mut fragments: Vec<&str> = Vec::new();
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (fragment, tail) = rest.split_at(rest.len().min(fragment_length));
        fragments.push(fragment);
        rest = tail;
    }
    let total = fragments.len();
    Ok(fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| format!("ur:bytes/{}of{}/{}/{}", i + 1, total, digest, fragment))
        .collect())
}

/// Decodes a set of workload strings back into the original payload.
///
/// A single workload may take the plain, digest-carrying or sequenced form;
/// multiple workloads must all be sequenced, agree on their total and
/// digest, and cover every index in `1..=total` exactly once. Order doesn't
/// matter.
///
/// # Examples
///
/// ```
/// let payload = bc32ur::ur::decode(
///     &["ur:bytes/fdyx2mrvdus8wmmjd3jq7hmkxr"],
///     "bytes",
/// )
/// .unwrap();
/// assert_eq!(payload, b"Hello world");
/// ```
///
/// # Errors
///
/// Any violated invariant aborts the whole decode with the corresponding
/// [`Error`]; a partially valid fragment set is never accepted.
pub fn decode<T: AsRef<str>>(workloads: &[T], ur_type: &str) -> Result<Vec<u8>, Error> {
    let (digest, body) = match workloads {
        [] => return Err(Error::InvalidWorkload),
        [single] => {
            let (digest, fragment) = parse_single(single.as_ref(), ur_type)?;
            (digest.map(ToString::to_string), fragment.to_string())
        }
        _ => {
            let (digest, body) = combine(workloads, ur_type)?;
            (Some(digest), body)
        }
    };

    let framed = crate::bc32::decode(&body)?;
    if let Some(digest) = digest {
        if crate::bc32::decode(&digest)? != crate::sha256(&framed) {
            return Err(Error::DigestMismatch);
        }
    }
    Ok(crate::cbor::unframe(&framed)?)
}

fn check_scheme(piece: &str, ur_type: &str) -> Result<(), Error> {
    let (scheme, declared_type) = piece.split_once(':').ok_or(Error::InvalidScheme)?;
    if scheme.eq_ignore_ascii_case("ur") && declared_type.eq_ignore_ascii_case(ur_type) {
        Ok(())
    } else {
        Err(Error::InvalidScheme)
    }
}

fn parse_sequence(piece: &str) -> Result<(usize, usize), Error> {
    let lower = piece.to_ascii_lowercase();
    let (index, total) = lower.split_once("of").ok_or(Error::InvalidSequence)?;
    let index: usize = index.parse().map_err(|_| Error::InvalidSequence)?;
    let total: usize = total.parse().map_err(|_| Error::InvalidSequence)?;
    if index == 0 || index > total {
        return Err(Error::IndexOutOfBounds);
    }
    Ok((index, total))
}

fn parse_single<'a>(
    workload: &'a str,
    ur_type: &str,
) -> Result<(Option<&'a str>, &'a str), Error> {
    let pieces: Vec<&str> = workload.split('/').collect();
    match *pieces.as_slice() {
        [scheme, fragment] => {
            check_scheme(scheme, ur_type)?;
            Ok((None, fragment))
        }
        [scheme, digest, fragment] => {
            check_scheme(scheme, ur_type)?;
            Ok((Some(digest), fragment))
        }
        [scheme, sequence, digest, fragment] => {
            check_scheme(scheme, ur_type)?;
            parse_sequence(sequence)?;
            Ok((Some(digest), fragment))
        }
        _ => Err(Error::InvalidWorkload),
    }
}

fn combine<T: AsRef<str>>(workloads: &[T], ur_type: &str) -> Result<(String, String), Error> {
    let total = workloads.len();
    let mut slots: Vec<Option<&str>> = vec![None; total];
    let mut digest: Option<&str> = None;

    for workload in workloads {
        let pieces: Vec<&str> = workload.as_ref().split('/').collect();
        let &[scheme, sequence, declared_digest, fragment] = pieces.as_slice() else {
            return Err(Error::InvalidWorkload);
        };
        check_scheme(scheme, ur_type)?;
        let (index, declared_total) = parse_sequence(sequence)?;
        if declared_total != total {
            return Err(Error::TotalMismatch);
        }
        match digest {
            Some(d) if d != declared_digest => return Err(Error::InconsistentDigest),
            _ => digest = Some(declared_digest),
        }
        let slot = &mut slots[index - 1];
        if slot.is_some() {
            return Err(Error::DuplicateIndex);
        }
        *slot = Some(fragment);
    }

    let mut body = String::new();
    for slot in slots {
        body.push_str(slot.ok_or(Error::MissingIndex)?);
    }
    // always set here, the workload list is non-empty
    let digest = digest.ok_or(Error::InvalidWorkload)?;
    Ok((digest.to_string(), body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_payload(length: usize) -> Vec<u8> {
        (0..length).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_single_part() {
        let workloads = encode(b"Hello world", DEFAULT_FRAGMENT_LENGTH).unwrap();
        assert_eq!(workloads, vec!["ur:bytes/fdyx2mrvdus8wmmjd3jq7hmkxr"]);
        assert_eq!(decode(&workloads, "bytes").unwrap(), b"Hello world");
    }

    #[test]
    fn test_single_part_with_digest() {
        let workload = "ur:bytes/964fclhltlspktszwlr47r26qyvrkzhsex83q8nh8ztnu5gykxjs2lmtp5/fdyx2mrvdus8wmmjd3jq7hmkxr";
        assert_eq!(decode(&[workload], "bytes").unwrap(), b"Hello world");

        // a valid bc32 string that is not this payload's digest
        let tampered = "ur:bytes/fpjkcmr0ypmk7unvvsh4ra4j/fdyx2mrvdus8wmmjd3jq7hmkxr";
        assert_eq!(
            decode(&[tampered], "bytes").unwrap_err(),
            Error::DigestMismatch
        );
    }

    #[test]
    fn test_single_part_sequenced() {
        let workload = "ur:bytes/1of1/964fclhltlspktszwlr47r26qyvrkzhsex83q8nh8ztnu5gykxjs2lmtp5/fdyx2mrvdus8wmmjd3jq7hmkxr";
        assert_eq!(decode(&[workload], "bytes").unwrap(), b"Hello world");
        assert_eq!(
            decode(&["ur:bytes/0of1/x/fdyx2mrvdus8wmmjd3jq7hmkxr"], "bytes").unwrap_err(),
            Error::IndexOutOfBounds
        );
        assert_eq!(
            decode(&["ur:bytes/oneof1/x/fdyx2mrvdus8wmmjd3jq7hmkxr"], "bytes").unwrap_err(),
            Error::InvalidSequence
        );
    }

    #[test]
    fn test_type_matching() {
        let workloads = encode(b"Hello world", DEFAULT_FRAGMENT_LENGTH).unwrap();
        assert_eq!(decode(&workloads, "BYTES").unwrap(), b"Hello world");
        assert_eq!(
            decode(&workloads, "crypto-psbt").unwrap_err(),
            Error::InvalidScheme
        );
        assert_eq!(
            decode(&["UR:BYTES/fdyx2mrvdus8wmmjd3jq7hmkxr"], "bytes").unwrap(),
            b"Hello world"
        );
        assert_eq!(
            decode(&["urn:bytes/fdyx2mrvdus8wmmjd3jq7hmkxr"], "bytes").unwrap_err(),
            Error::InvalidScheme
        );
    }

    #[test]
    fn test_fragmentation() {
        let payload = b"Some binary data".repeat(10);
        let workloads = encode(&payload, 100).unwrap();
        assert_eq!(workloads, vec![
            "ur:bytes/1of3/z3pwwefsl9vmyxf7yzlh5azlwj6zegeqzwf9uuvqq9z2wzhyx5cslh2wh7/tzs9xmmdv5sxy6twv9e8jgryv96xz5m0d4jjqcnfdeshy7fqv3shgc2ndakk2grzd9hxzuneypjxzarp2dhk6efqvf5kuctj0ysx",
            "ur:bytes/2of3/z3pwwefsl9vmyxf7yzlh5azlwj6zegeqzwf9uuvqq9z2wzhyx5cslh2wh7/gct5v9fk7mt9yp3xjmnpwfujqerpw3s4xmmdv5sxy6twv9e8jgryv96xz5m0d4jjqcnfdeshy7fqv3shgc2ndakk2grzd9hxzune",
            "ur:bytes/3of3/z3pwwefsl9vmyxf7yzlh5azlwj6zegeqzwf9uuvqq9z2wzhyx5cslh2wh7/ypjxzarp2dhk6efqvf5kuctj0ysxgct5v9fk7mt9yp3xjmnpwfujqerpw3ss28lvx8",
        ]);
        assert_eq!(decode(&workloads, "bytes").unwrap(), payload);
    }

    #[test]
    fn test_fragment_count() {
        for (length, fragment_length) in [(100, 10), (1000, 200), (5000, 337)] {
            let payload = make_payload(length);
            let framed = crate::cbor::frame(&payload).unwrap();
            let body_length = crate::bc32::encode(&framed).unwrap().len();
            let workloads = encode(&payload, fragment_length).unwrap();
            assert_eq!(
                workloads.len(),
                (body_length + fragment_length - 1) / fragment_length
            );
            for (i, workload) in workloads.iter().enumerate() {
                let prefix = format!("ur:bytes/{}of{}/", i + 1, workloads.len());
                assert!(workload.starts_with(&prefix));
            }
            assert_eq!(decode(&workloads, "bytes").unwrap(), payload);
        }
    }

    #[test]
    fn test_order_independence() {
        let payload = make_payload(2000);
        let mut workloads = encode(&payload, 150).unwrap();
        workloads.reverse();
        assert_eq!(decode(&workloads, "bytes").unwrap(), payload);
        let mid = workloads.len() / 2;
        workloads.rotate_left(mid);
        assert_eq!(decode(&workloads, "bytes").unwrap(), payload);
    }

    #[test]
    fn test_incomplete_set() {
        let payload = make_payload(2000);
        let workloads = encode(&payload, 150).unwrap();
        assert!(workloads.len() > 2);
        assert_eq!(
            decode(&workloads[1..], "bytes").unwrap_err(),
            Error::TotalMismatch
        );
        assert_eq!(
            decode(&workloads[..2], "bytes").unwrap_err(),
            Error::TotalMismatch
        );
    }

    #[test]
    fn test_duplicate_index() {
        let payload = make_payload(2000);
        let mut workloads = encode(&payload, 150).unwrap();
        let first = workloads[0].clone();
        workloads[1] = first;
        assert_eq!(
            decode(&workloads, "bytes").unwrap_err(),
            Error::DuplicateIndex
        );
    }

    #[test]
    fn test_inconsistent_digest() {
        let payload = make_payload(2000);
        let framed = crate::cbor::frame(&payload).unwrap();
        let digest = crate::bc32::encode(&crate::sha256(&framed)).unwrap();
        let mut workloads = encode(&payload, 150).unwrap();
        workloads[2] = workloads[2].replacen(&digest, "fpjkcmr0ypmk7unvvsh4ra4j", 1);
        assert_eq!(
            decode(&workloads, "bytes").unwrap_err(),
            Error::InconsistentDigest
        );
    }

    #[test]
    fn test_tampered_fragment() {
        let payload = make_payload(2000);
        let mut workloads = encode(&payload, 150).unwrap();
        // swap the bodies of two fragments while keeping their indices
        let (a, b) = (workloads[0].clone(), workloads[1].clone());
        let body_a = a.rsplit('/').next().unwrap().to_string();
        let body_b = b.rsplit('/').next().unwrap().to_string();
        workloads[0] = a.replace(&body_a, &body_b);
        workloads[1] = b.replace(&body_b, &body_a);
        assert!(decode(&workloads, "bytes").is_err());
    }

    #[test]
    fn test_invalid_workloads() {
        assert_eq!(
            decode::<&str>(&[], "bytes").unwrap_err(),
            Error::InvalidWorkload
        );
        assert_eq!(
            decode(&["ur:bytes"], "bytes").unwrap_err(),
            Error::InvalidWorkload
        );
        assert_eq!(
            decode(&["ur:bytes/a/b/c/d/e"], "bytes").unwrap_err(),
            Error::InvalidWorkload
        );
        // multi-part workloads must all take the four-piece form
        let payload = make_payload(2000);
        let mut workloads = encode(&payload, 150).unwrap();
        workloads[1] = "ur:bytes/fdyx2mrvdus8wmmjd3jq7hmkxr".to_string();
        assert_eq!(
            decode(&workloads, "bytes").unwrap_err(),
            Error::InvalidWorkload
        );
        assert_eq!(encode(b"x", 0).unwrap_err(), Error::InvalidWorkload);
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            encode(&[], DEFAULT_FRAGMENT_LENGTH).unwrap_err(),
            Error::Cbor(crate::cbor::Error::LengthOverflow)
        );
    }

    #[test]
    fn test_roundtrip_sizes() {
        // lengths straddling the one-, two- and three-byte header classes
        for length in [1, 23, 24, 255, 256, 300, 65535, 65536] {
            let payload = make_payload(length);
            let workloads = encode(&payload, DEFAULT_FRAGMENT_LENGTH).unwrap();
            assert_eq!(decode(&workloads, "bytes").unwrap(), payload);
        }
    }
}
