//! Combined digest over the individual results
//!
//! The combined digest hashes the concatenation of every hex digest, in
//! display-name order with no separators, so it depends only on the set of
//! entries and never on the order algorithms were requested or finished.

use crate::hashing::{DigestMap, HashAlgorithm};
use log::debug;

/// Algorithm used when none is configured or the configured one is unknown
pub const DEFAULT_COMBINER: HashAlgorithm = HashAlgorithm::Sha256;

/// Combine with an optionally named algorithm
///
/// Unknown names fall back to SHA-256 instead of failing.
pub fn combine(digests: &DigestMap, combiner: Option<&str>) -> Option<String> {
    let algorithm = match combiner {
        None => DEFAULT_COMBINER,
        Some(name) => name.parse().unwrap_or_else(|_| {
            debug!("Unknown combiner algorithm '{name}', using {DEFAULT_COMBINER}");
            DEFAULT_COMBINER
        }),
    };
    combine_with(digests, algorithm)
}

/// Combine with a specific algorithm; `None` for fewer than two digests
pub fn combine_with(digests: &DigestMap, algorithm: HashAlgorithm) -> Option<String> {
    if digests.len() <= 1 {
        return None;
    }

    let mut hasher = algorithm.create_hasher();
    for (_, hex) in digests.iter() {
        hasher.update(hex.as_bytes());
    }
    Some(hasher.finalize())
}
