//! BLAKE2 family at native output size: BLAKE2b-512 and BLAKE2s-256

use super::adapter::DigestHasher;
use crate::hashing::traits::StreamingHasher;
use blake2::{Blake2b512, Blake2s256};

pub(crate) fn new_blake2b() -> Box<dyn StreamingHasher> {
    DigestHasher::<Blake2b512>::boxed()
}

pub(crate) fn new_blake2s() -> Box<dyn StreamingHasher> {
    DigestHasher::<Blake2s256>::boxed()
}
