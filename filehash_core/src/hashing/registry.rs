//! Fixed table of supported digest algorithms
//!
//! The supported set is closed and known at build time, so the registry is a
//! static array indexed by [`HashAlgorithm`] discriminant rather than a
//! runtime-mutable map.

use super::algorithms::{blake2, md5, sha1, sha2, sha3};
use super::traits::StreamingHasher;
use super::HashAlgorithm;
use crate::error::ValidationError;
use crate::Result;

/// One registered algorithm
#[derive(Debug)]
pub struct AlgorithmEntry {
    pub algorithm: HashAlgorithm,
    /// Lowercase slug used in configuration files and on the command line
    pub id: &'static str,
    pub display_name: &'static str,
    /// Native digest size in bytes
    pub output_len: usize,
    pub constructor: fn() -> Box<dyn StreamingHasher>,
}

macro_rules! entry {
    ($algorithm:ident, $id:literal, $name:literal, $len:literal, $ctor:path) => {
        AlgorithmEntry {
            algorithm: HashAlgorithm::$algorithm,
            id: $id,
            display_name: $name,
            output_len: $len,
            constructor: $ctor,
        }
    };
}

static REGISTRY: [AlgorithmEntry; 10] = [
    entry!(Md5, "md5", "MD5", 16, md5::new_md5),
    entry!(Sha1, "sha1", "SHA-1", 20, sha1::new_sha1),
    entry!(Sha224, "sha224", "SHA-224", 28, sha2::new_sha224),
    entry!(Sha256, "sha256", "SHA-256", 32, sha2::new_sha256),
    entry!(Sha384, "sha384", "SHA-384", 48, sha2::new_sha384),
    entry!(Sha512, "sha512", "SHA-512", 64, sha2::new_sha512),
    entry!(Sha3_256, "sha3-256", "SHA3-256", 32, sha3::new_sha3_256),
    entry!(Sha3_512, "sha3-512", "SHA3-512", 64, sha3::new_sha3_512),
    entry!(Blake2b, "blake2b", "BLAKE2b", 64, blake2::new_blake2b),
    entry!(Blake2s, "blake2s", "BLAKE2s", 32, blake2::new_blake2s),
];

/// All registered entries, in registry order
pub fn entries() -> &'static [AlgorithmEntry] {
    &REGISTRY
}

/// Supported algorithms, in registry order
pub fn list_algorithms() -> &'static [HashAlgorithm] {
    &HashAlgorithm::ALL
}

pub(crate) fn entry(algorithm: HashAlgorithm) -> &'static AlgorithmEntry {
    &REGISTRY[algorithm as usize]
}

/// Find an entry by display name or slug
///
/// Matching ignores case, dashes and underscores, so `SHA-256`, `sha256`
/// and `Sha_256` all resolve to the same entry.
pub fn lookup(name: &str) -> Option<&'static AlgorithmEntry> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }
    REGISTRY
        .iter()
        .find(|entry| normalize(entry.display_name) == wanted)
}

/// Construct a fresh digest context for a user-supplied identifier
pub fn new_digest_context(id: &str) -> Result<Box<dyn StreamingHasher>> {
    lookup(id)
        .map(|entry| (entry.constructor)())
        .ok_or_else(|| ValidationError::unknown_algorithm(id).into())
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
