use std::collections::HashSet;
use std::fmt;

/// Opaque token identifying one node of a reference graph.
///
/// Identities are assigned by the owner of the graph (see [`Graph`](crate::Graph)),
/// never derived from memory addresses, and are only meaningful within a
/// single digest computation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    pub fn new(token: u64) -> Self {
        Identity(token)
    }

    pub fn token(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(#{})", self.0)
    }
}

/// Tracks which references have already been entered during one digest computation.
///
/// A guard is created per top-level call and dropped when it returns.
#[derive(Debug, Default)]
pub struct CycleGuard {
    visited: HashSet<Identity>,
}

impl CycleGuard {
    pub fn new() -> Self {
        CycleGuard {
            visited: HashSet::new(),
        }
    }

    /// Marks `identity` as visited.
    ///
    /// Returns `true` the first time an identity is entered and `false` on
    /// every later occurrence, in which case the caller must not descend.
    pub fn enter(&mut self, identity: Identity) -> bool {
        self.visited.insert(identity)
    }

    pub fn contains(&self, identity: Identity) -> bool {
        self.visited.contains(&identity)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
