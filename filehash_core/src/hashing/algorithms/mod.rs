//! Hash algorithm implementations
//!
//! Each family module exposes plain constructor functions that the
//! registry table points at.

mod adapter;
pub(crate) mod blake2;
pub(crate) mod md5;
pub(crate) mod sha1;
pub(crate) mod sha2;
pub(crate) mod sha3;

#[cfg(test)]
pub(crate) fn digest_of(constructor: fn() -> Box<dyn super::StreamingHasher>, data: &[u8]) -> String {
    let mut hasher = constructor();
    hasher.update(data);
    hasher.finalize()
}
