//! SHA-1 hash algorithm implementation

use super::adapter::DigestHasher;
use crate::hashing::traits::StreamingHasher;
use sha1::Sha1;

pub(crate) fn new_sha1() -> Box<dyn StreamingHasher> {
    DigestHasher::<Sha1>::boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::algorithms::digest_of;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest_of(new_sha1, b""),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            digest_of(new_sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
