//! Content fingerprints for cache busting.

use crate::build::build;
use crate::error::Result;
use crate::source::Source;
use sha2::{Digest, Sha256};

/// Number of SHA-256 bytes kept in a fingerprint (16 hex characters)
pub const FINGERPRINT_BYTES: usize = 8;

/// Short SHA-256 fingerprint of a built stylesheet.
///
/// Empty input yields an empty fingerprint rather than the hash of nothing,
/// so "no stylesheet" stays distinguishable from "empty stylesheet".
pub fn fingerprint(css: &str) -> String {
    if css.is_empty() {
        return String::new();
    }

    let mut hasher = Sha256::new();
    hasher.update(css.as_bytes());
    let result = hasher.finalize();

    result[..FINGERPRINT_BYTES]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Build the stylesheet and its fingerprint in one go.
///
/// Use the fingerprint in the published file name, e.g.
/// `styles.{hash}.css`. Both values are empty when no source contains any
/// stylesheet.
pub fn build_with_hash(sources: &[Source<'_>]) -> Result<(String, String)> {
    let css = build(sources)?;
    let hash = fingerprint(&css);
    Ok((css, hash))
}
