use std::fmt;

use crate::sink::SinkError;

/// Where inside an enclosing container an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Index into a sequence.
    Element(usize),
    /// Key of the n-th entry of a mapping, in canonical order.
    Key(usize),
    /// Value of the n-th entry of a mapping, in canonical order.
    Value(usize),
    /// Declared member of an aggregate.
    Field(String),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Element(i) => write!(f, "element {}", i),
            Position::Key(i) => write!(f, "key {}", i),
            Position::Value(i) => write!(f, "value {}", i),
            Position::Field(name) => write!(f, "field `{}`", name),
        }
    }
}

/// Error kinds, independent of positional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DepthExceeded,
    UnsupportedType,
    SinkWriteFailure,
}

/// Error type for imprint operations.
#[derive(Debug, thiserror::Error)]
pub enum ImprintError {
    #[error("depth limit of {limit} exceeded at type {type_name}")]
    DepthExceeded { type_name: String, limit: usize },
    #[error("unsupported type {type_name}: {reason}")]
    UnsupportedType { type_name: String, reason: String },
    #[error("hash sink rejected write")]
    SinkWrite(#[from] SinkError),
    #[error("{position}: {source}")]
    At {
        position: Position,
        #[source]
        source: Box<ImprintError>,
    },
}

impl ImprintError {
    /// Wraps this error with the position of the enclosing container.
    pub(crate) fn at(self, position: Position) -> Self {
        ImprintError::At {
            position,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping positional context.
    pub fn root(&self) -> &ImprintError {
        let mut current = self;
        while let ImprintError::At { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the kind of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImprintError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            ImprintError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            ImprintError::SinkWrite(_) => ErrorKind::SinkWriteFailure,
            ImprintError::At { source, .. } => source.kind(),
        }
    }

    /// Returns the positions leading to the failing value, outermost first.
    pub fn path(&self) -> Vec<&Position> {
        let mut positions = Vec::new();
        let mut current = self;
        while let ImprintError::At { position, source } = current {
            positions.push(position);
            current = source;
        }
        positions
    }
}
