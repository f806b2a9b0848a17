//! SHA-2 family: SHA-224, SHA-256, SHA-384 and SHA-512

use super::adapter::DigestHasher;
use crate::hashing::traits::StreamingHasher;
use sha2::{Sha224, Sha256, Sha384, Sha512};

pub(crate) fn new_sha224() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha224>::boxed()
}

pub(crate) fn new_sha256() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha256>::boxed()
}

pub(crate) fn new_sha384() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha384>::boxed()
}

pub(crate) fn new_sha512() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha512>::boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::algorithms::digest_of;

    #[test]
    fn test_sha224_abc() {
        assert_eq!(
            digest_of(new_sha224, b"abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
    }

    #[test]
    fn test_sha256_vectors() {
        assert_eq!(
            digest_of(new_sha256, b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_of(new_sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha384_abc() {
        assert_eq!(
            digest_of(new_sha384, b"abc"),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn test_sha512_abc() {
        assert_eq!(
            digest_of(new_sha512, b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }
}
