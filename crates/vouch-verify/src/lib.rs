//! Digest providers for verifying content fetched from untrusted mirrors.
//!
//! A provider turns a byte sequence into a stable [`HexDigest`]. It comes in
//! two shapes:
//!
//! - [`SyncDigest`] returns the digest directly.
//! - [`CallbackDigest`] reports it later through a [`DigestCompletion`].
//!
//! [`DigestProvider`] wraps either shape behind one async `compute`, so code
//! that verifies content never branches on how the digest is produced.
//!
//! # Example
//!
//! ```
//! use vouch_verify::{Sha256, SyncDigest};
//!
//! let digest = Sha256.digest(b"hello world");
//! assert!(digest.matches("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"));
//! assert!(!digest.matches("B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9"));
//! ```

pub use self::digest::HexDigest;
pub use self::error::{DigestError, ParseDigestError, Result};
pub use self::hasher::Offloaded;
pub use self::provider::{CallbackDigest, DigestCompletion, DigestProvider, SyncDigest};

#[cfg(feature = "sha256")]
pub use self::hasher::Sha256;

#[cfg(feature = "blake3")]
pub use self::hasher::Blake3;

mod digest;
mod error;
mod hasher;
mod provider;
