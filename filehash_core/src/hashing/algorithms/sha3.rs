//! SHA-3 family

use super::adapter::DigestHasher;
use crate::hashing::traits::StreamingHasher;
use sha3::{Sha3_256, Sha3_512};

pub(crate) fn new_sha3_256() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha3_256>::boxed()
}

pub(crate) fn new_sha3_512() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha3_512>::boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::algorithms::digest_of;

    #[test]
    fn test_sha3_256_vectors() {
        assert_eq!(
            digest_of(new_sha3_256, b""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            digest_of(new_sha3_256, b"abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_sha3_512_abc() {
        assert_eq!(
            digest_of(new_sha3_512, b"abc"),
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
        );
    }
}
