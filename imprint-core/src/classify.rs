use tracing::{debug, trace};

use crate::error::ImprintError;
use crate::guard::CycleGuard;
use crate::imprint::Imprint;
use crate::kind::Kind;
use crate::options::Options;
use crate::view::{Reference, View};

/// Resolves indirections and enforces the nesting limit.
///
/// The same depth counter covers reference hops and structural descent, so a
/// long pointer chain and a deeply nested container hit the same limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Classifier {
    max_depth: usize,
}

impl Classifier {
    pub(crate) fn new(max_depth: usize) -> Self {
        Classifier { max_depth }
    }

    /// Fails if `value`, found at `depth`, is nested deeper than allowed.
    pub(crate) fn check_depth(&self, value: &dyn Imprint, depth: usize) -> Result<(), ImprintError> {
        if depth > self.max_depth {
            let type_name = value.type_name().into_owned();
            debug!(%type_name, limit = self.max_depth, "depth limit exceeded");
            return Err(ImprintError::DepthExceeded {
                type_name,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// Returns the target of a reference, or `None` if its identity was
    /// already entered during this computation.
    pub(crate) fn follow<'r>(
        &self,
        reference: &'r Reference<'_>,
        guard: &mut CycleGuard,
    ) -> Option<&'r dyn Imprint> {
        if let Some(identity) = reference.identity {
            if !guard.enter(identity) {
                trace!(?identity, "reference already visited");
                return None;
            }
        }
        Some(&*reference.target)
    }

    fn kind_of(&self, value: &dyn Imprint, depth: usize, guard: &mut CycleGuard) -> Result<Kind, ImprintError> {
        self.check_depth(value, depth)?;
        let view = value.view();
        if let View::Reference(reference) = &view {
            return match self.follow(reference, guard) {
                Some(target) => self.kind_of(target, depth + 1, guard),
                None => Ok(Kind::Nil),
            };
        }
        Ok(view.kind().unwrap_or(Kind::Nil))
    }
}

/// Returns the kind `value` resolves to once all references are followed.
///
/// A reference cycle that never reaches a concrete value resolves to [`Kind::Nil`],
/// matching the fact that it encodes to nothing.
pub fn classify(value: &dyn Imprint, options: &Options) -> Result<Kind, ImprintError> {
    let mut guard = CycleGuard::new();
    Classifier::new(options.max_depth).kind_of(value, 0, &mut guard)
}
