//! CHIP TLV decoding, encoding, and traversal in pure Rust.
//!
//! `rustchip-core` provides a zero-copy, `no_std`-compatible cursor over the
//! CHIP tag-length-value encoding, a writer into caller-owned buffers, and a
//! single callback-driven traversal algorithm used to iterate, count, and find
//! elements without materializing a tree.
//!
//! # Feature flags
//!
//! - **`std`** (default): enables `std::error::Error` implementations.
//! - **`serde`**: derives `Serialize`/`Deserialize` on tag and type enums.
//! - **`defmt`**: derives `defmt::Format` for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

/// Error types for encoding and decoding operations.
pub mod error;
/// TLV tags, element types, cursor, writer, and traversal utilities.
pub mod tlv;

pub use error::{DecodeError, EncodeError};
