use tracing::{debug, instrument};

use crate::encoder::Encoder;
use crate::error::ImprintError;
use crate::fingerprint::Fingerprint;
use crate::imprint::Imprint;
use crate::options::Options;
use crate::sink::Sink;

/// Computes digests with a fixed set of [`Options`].
///
/// Each call uses a fresh cycle guard, so an `Imprinter` can be shared freely
/// between threads as long as every call brings its own sink.
#[derive(Debug, Clone, Default)]
pub struct Imprinter {
    options: Options,
}

impl Imprinter {
    pub fn new(options: Options) -> Self {
        Imprinter { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Writes the canonical encoding of `value` into `sink` without finalizing it.
    pub fn encode<S: Sink + ?Sized>(&self, value: &dyn Imprint, sink: &mut S) -> Result<(), ImprintError> {
        Encoder::new(sink, self.options.clone()).encode(value)
    }

    /// Encodes `value` into `sink` and returns the finalized digest.
    ///
    /// The sink is neither reset before nor after; on error it is left
    /// partially written and no digest is produced.
    #[instrument(level = "debug", skip_all, fields(type_name = %value.type_name()))]
    pub fn digest<S: Sink + ?Sized>(&self, value: &dyn Imprint, sink: &mut S) -> Result<Fingerprint, ImprintError> {
        debug!("computing digest");
        if let Err(err) = self.encode(value, sink) {
            debug!(error = %err, "digest aborted");
            return Err(err);
        }
        let fingerprint = Fingerprint::from_bytes(sink.finalize());
        debug!(short = %fingerprint.short(), "digest computed");
        Ok(fingerprint)
    }
}

/// Computes the digest of `value` with default options.
///
/// ```
/// use imprint_core::compute_digest;
///
/// let a = compute_digest(&42i64, &mut blake3::Hasher::new()).unwrap();
/// let b = compute_digest(&42u64, &mut blake3::Hasher::new()).unwrap();
/// assert_ne!(a, b);
/// ```
pub fn compute_digest<S: Sink + ?Sized>(value: &dyn Imprint, sink: &mut S) -> Result<Fingerprint, ImprintError> {
    Imprinter::default().digest(value, sink)
}
