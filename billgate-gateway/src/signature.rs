//! Canonical field signing for the EpusdtPay wire protocol.
//!
//! Both sides compute the same digest independently, so the serialization
//! is fixed byte-for-byte:
//!
//! 1. Drop fields whose value is the empty string, and the field named
//!    `signature`.
//! 2. Sort the rest by key, ascending byte order.
//! 3. Join as `key=value&`, strip the trailing `&`.
//! 4. Append the shared API token directly, no separator.
//! 5. MD5 the bytes, encode as lowercase hex.
//!
//! Values are signed exactly as given: no trimming, no case folding.

use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Field name always excluded from the digest.
pub const SIGNATURE_FIELD: &str = "signature";

/// Compute the canonical digest over `fields` with the shared `token`.
///
/// Input order is irrelevant; `BTreeMap` iteration fixes the key order.
pub fn sign(fields: &BTreeMap<String, String>, token: &str) -> String {
    let mut canon = String::new();
    for (key, value) in fields {
        if value.is_empty() || key == SIGNATURE_FIELD {
            continue;
        }
        canon.push_str(key);
        canon.push('=');
        canon.push_str(value);
        canon.push('&');
    }
    canon.pop();
    canon.push_str(token);

    hex::encode(Md5::digest(canon.as_bytes()))
}

/// Verify `candidate` against the digest recomputed over `fields`.
///
/// The comparison is constant-time; any difference, including length,
/// yields false.
pub fn verify(fields: &BTreeMap<String, String>, token: &str, candidate: &str) -> bool {
    let expected = sign(fields, token);
    ring::constant_time::verify_slices_are_equal(expected.as_bytes(), candidate.as_bytes()).is_ok()
}

/// Types that participate in canonical signing.
pub trait Signable {
    /// The scalar wire fields of `self`, keyed by wire name. The
    /// `signature` field itself must not be included.
    fn signing_fields(&self) -> BTreeMap<String, String>;

    /// Digest of `self` under `token`.
    fn digest(&self, token: &str) -> String {
        sign(&self.signing_fields(), token)
    }

    /// Whether `candidate` is the digest of `self` under `token`.
    fn verify_digest(&self, token: &str, candidate: &str) -> bool {
        verify(&self.signing_fields(), token, candidate)
    }
}
