//! Streaming digest abstraction shared by every registered algorithm

/// A fresh, single-use digest context
///
/// Contexts consume bytes incrementally and are consumed by `finalize`,
/// so one context can never be observed by two hashing operations.
pub trait StreamingHasher: Send {
    /// Feed the next chunk of input
    fn update(&mut self, data: &[u8]);

    /// Produce the lowercase hex digest of everything fed so far
    fn finalize(self: Box<Self>) -> String;
}
