//! `bc32ur` is a crate to interact with bc32-encoded "Uniform Resource"
//! representations of binary data. The encoding scheme is optimized for
//! transport over low-bandwidth visual channels such as sequential QR
//! codes, where payloads must be transcribable and errors detectable.
//!
//! # Encode binary data
//! ```
//! let encoded = bc32ur::bc32::encode(b"Hello world").unwrap();
//! assert_eq!(encoded, "fpjkcmr0ypmk7unvvsh4ra4j");
//! assert_eq!(bc32ur::bc32::decode(&encoded).unwrap(), b"Hello world");
//! ```
//!
//! # Split up payloads into uniform resource workloads
//!
//! Payloads are framed with a length header, bc32-encoded, and split into
//! as many `ur:` workload strings as the fragment length requires. Each
//! multi-part workload declares its index, the total count and a shared
//! SHA-256 digest.
//! ```
//! let data = b"Some binary data".repeat(100);
//! let workloads = bc32ur::encode(&data, 200).unwrap();
//! assert_eq!(workloads.len(), 13);
//! assert!(workloads[0].starts_with("ur:bytes/1of13/"));
//! ```
//!
//! # Restore a payload from its workloads
//!
//! The receiver collects all fragments, in any order, and decodes them in
//! one call. Every fragment carries the shared digest, so a mixed-up or
//! incomplete set is rejected instead of yielding corrupt bytes.
//! ```
//! let data = b"Some binary data".repeat(100);
//! let mut workloads = bc32ur::encode(&data, 200).unwrap();
//! workloads.reverse();
//! assert_eq!(bc32ur::decode(&workloads, "bytes").unwrap(), data);
//! ```

pub mod bc32;
pub mod bits;
pub mod cbor;
pub mod ur;

pub use self::ur::decode;
pub use self::ur::encode;

/// Computes the 256-bit digest shared by the fragments of a multi-part UR.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use bitcoin_hashes::Hash;
    bitcoin_hashes::sha256::Hash::hash(data).to_byte_array()
}
