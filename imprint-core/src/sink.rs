//! Hash sinks: incremental byte accumulators that produce the final digest.

/// Error returned when a sink rejects a write.
#[derive(Debug, thiserror::Error)]
#[error("sink write failed: {0}")]
pub struct SinkError(pub String);

/// An incremental byte accumulator.
///
/// The encoder only ever appends bytes and asks for the final digest once.
/// `finalize` must not reset the sink; callers own its lifecycle.
pub trait Sink {
    /// Appends bytes, returning how many were consumed.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError>;

    /// Returns the digest of everything written so far.
    fn finalize(&self) -> Vec<u8>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        (**self).write(bytes)
    }

    fn finalize(&self) -> Vec<u8> {
        (**self).finalize()
    }
}

impl Sink for blake3::Hasher {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.update(bytes);
        Ok(bytes.len())
    }

    fn finalize(&self) -> Vec<u8> {
        blake3::Hasher::finalize(self).as_bytes().to_vec()
    }
}

/// Adapts any RustCrypto [`digest::Digest`] hasher (SHA-2, SHA-3, ...) to [`Sink`].
#[derive(Debug, Clone, Default)]
pub struct DigestSink<D> {
    inner: D,
}

impl<D: digest::Digest + Clone> DigestSink<D> {
    pub fn new() -> Self {
        DigestSink { inner: D::new() }
    }

    /// Wraps an existing hasher, keeping whatever it has already absorbed.
    pub fn from_hasher(inner: D) -> Self {
        DigestSink { inner }
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: digest::Digest + Clone> Sink for DigestSink<D> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        digest::Digest::update(&mut self.inner, bytes);
        Ok(bytes.len())
    }

    fn finalize(&self) -> Vec<u8> {
        digest::Digest::finalize(self.inner.clone()).to_vec()
    }
}

/// A sink that keeps the raw bytes; its "digest" is the canonical encoding itself.
///
/// Useful for inspecting exactly what the encoder emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    bytes: Vec<u8>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink { bytes: Vec::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl Sink for RecordingSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.bytes.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn finalize(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}
