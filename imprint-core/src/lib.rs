//! Imprint computes deterministic, type-discriminating digests of structured values.
//!
//! Core concepts:
//! - **Imprint**: A type that exposes its structure to the encoder (usually via `#[derive(Imprint)]`)
//! - **View**: One level of structure of a value (scalar, sequence, mapping, aggregate, reference, nil)
//! - **Sink**: An incremental hash accumulator supplied by the caller (Blake3, any RustCrypto digest, ...)
//! - **Graph**: An arena for shared and self-referential dynamic [`Value`]s
//! - **Fingerprint**: The finalized digest
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use imprint_core::{compute_digest, Imprint};
//!
//! #[derive(Imprint)]
//! struct Trade {
//!     id: u64,
//!     tags: HashMap<String, String>,
//!     #[imprint(skip)]
//!     cached_total: f64,
//! }
//!
//! let trade = Trade { id: 7, tags: HashMap::new(), cached_total: 0.0 };
//! let digest = compute_digest(&trade, &mut blake3::Hasher::new()).unwrap();
//! println!("{}", digest.short());
//! ```
//!
//! # Encoding
//!
//! Scalars are written as a tag byte followed by a fixed-width little-endian
//! value. Sequences keep their order, mappings are written in a canonical key
//! order, and aggregates are prefixed with their type name and module path.
//! Empty collections write their type name so that `Vec<u8>` and `Vec<String>`
//! differ. References are transparent, and references carrying an identity
//! (graph nodes) are entered at most once per digest.
//!
//! Digests are deterministic within one version of this crate and one set of
//! [`Options`]; they are not meant to be stable across versions.

extern crate self as imprint_core;

mod classify;
mod encoder;
mod error;
mod fingerprint;
mod guard;
mod imprint;
mod imprinter;
mod kind;
mod options;
mod order;
pub mod sink;
mod value;
mod view;

pub use classify::classify;
pub use encoder::Encoder;
pub use error::{ErrorKind, ImprintError, Position};
pub use fingerprint::{Fingerprint, Short};
pub use guard::{CycleGuard, Identity};
pub use imprint::{Complex, Imprint};
pub use imprinter::{compute_digest, Imprinter};
pub use kind::{FloatType, IntType, Kind, UintType};
pub use options::{Options, OptionsError, StringFraming, DEFAULT_MAX_DEPTH};
pub use sink::{DigestSink, RecordingSink, Sink, SinkError};
pub use value::{Graph, GraphError, Node, NodeId, Value};
pub use view::{Aggregate, Child, Field, Reference, View};

#[cfg(feature = "derive")]
pub use imprint_derive::Imprint;
