use crate::hashing::traits::StreamingHasher;
use sha2::Digest;

/// Wraps any RustCrypto digest as a boxed streaming hasher
pub(crate) struct DigestHasher<D> {
    inner: D,
}

impl<D: Digest + Send + 'static> DigestHasher<D> {
    pub(crate) fn boxed() -> Box<dyn StreamingHasher> {
        Box::new(Self { inner: D::new() })
    }
}

impl<D: Digest + Send> StreamingHasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> String {
        hex::encode(self.inner.finalize())
    }
}
