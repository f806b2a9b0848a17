//! MD5 hash algorithm implementation

use super::adapter::DigestHasher;
use crate::hashing::traits::StreamingHasher;
use md5::Md5;

pub(crate) fn new_md5() -> Box<dyn StreamingHasher> {
    DigestHasher::<Md5>::boxed()
}
