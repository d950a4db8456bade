//! Dynamically typed values and an arena for reference graphs.
//!
//! [`Value`] covers data whose shape is only known at runtime, such as
//! heterogeneous maps. Shared or self-referential data lives in a [`Graph`]
//! and is linked with [`Value::Ref`]; the [`NodeId`] doubles as the identity
//! used for cycle detection.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::guard::Identity;
use crate::imprint::{Complex, Imprint};
use crate::kind::{FloatType, IntType, UintType};
use crate::view::{Aggregate, Child, Field, Reference, View};

/// Index of a node inside a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }

    fn identity(&self) -> Identity {
        Identity::new(self.0 as u64)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dynamically typed value.
///
/// Scalars report the same type names as the matching Rust primitives, so
/// `Value::I64(7)` and `7i64` produce the same digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Nil without any declared type.
    Nil,
    /// Nil reference to the named type.
    TypedNil(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    Char(char),
    String(String),
    /// Ordered list; `type_name` identifies empty lists.
    List { type_name: String, items: Vec<Value> },
    /// Unordered map; `type_name` identifies empty maps.
    Map {
        type_name: String,
        entries: Vec<(Value, Value)>,
    },
    /// Record with declared fields in order. Field names are not hashed.
    Record {
        name: String,
        namespace: String,
        fields: Vec<(String, Value)>,
    },
    /// Reference to a node of the enclosing graph.
    Ref(NodeId),
    /// A function value. Cannot be hashed.
    Function(String),
    /// A channel. Cannot be hashed.
    Channel(String),
    /// A dynamic value without a concrete type. Cannot be hashed.
    Opaque(String),
}

impl Value {
    pub fn list(type_name: impl Into<String>, items: impl IntoIterator<Item = Value>) -> Self {
        Value::List {
            type_name: type_name.into(),
            items: items.into_iter().collect(),
        }
    }

    pub fn map(
        type_name: impl Into<String>,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        Value::Map {
            type_name: type_name.into(),
            entries: entries.into_iter().collect(),
        }
    }

    pub fn record(
        name: impl Into<String>,
        namespace: impl Into<String>,
        fields: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> Self {
        Value::Record {
            name: name.into(),
            namespace: namespace.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn typed_nil(type_name: impl Into<String>) -> Self {
        Value::TypedNil(type_name.into())
    }
}

macro_rules! impl_value_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_from!(bool, Bool);
impl_value_from!(i8, I8);
impl_value_from!(i16, I16);
impl_value_from!(i32, I32);
impl_value_from!(i64, I64);
impl_value_from!(u8, U8);
impl_value_from!(u16, U16);
impl_value_from!(u32, U32);
impl_value_from!(u64, U64);
impl_value_from!(f32, F32);
impl_value_from!(f64, F64);
impl_value_from!(char, Char);
impl_value_from!(String, String);
impl_value_from!(NodeId, Ref);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// Error type for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NotFound(NodeId),
}

/// Arena owning the nodes of a reference graph.
///
/// Cycles are built by reserving a node first and filling it once the nodes
/// that point back at it exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Value>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    /// Adds a node and returns its id.
    pub fn insert(&mut self, value: Value) -> NodeId {
        self.nodes.push(value);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a placeholder node (untyped nil) to be filled with [`Graph::set`].
    pub fn reserve(&mut self) -> NodeId {
        self.insert(Value::Nil)
    }

    /// Replaces the value of a node, returning the previous one.
    pub fn set(&mut self, id: NodeId, value: Value) -> Result<Value, GraphError> {
        let slot = self.nodes.get_mut(id.0).ok_or(GraphError::NotFound(id))?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn get(&self, id: NodeId) -> Option<&Value> {
        self.nodes.get(id.0)
    }

    /// Returns a hashable reference to a node.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node {
            graph: Some(self),
            slot: Slot::Ref(id),
        }
    }

    /// Returns a hashable view of a value whose references point into this graph.
    pub fn value<'g>(&'g self, value: &'g Value) -> Node<'g> {
        Node {
            graph: Some(self),
            slot: Slot::Value(value),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot<'g> {
    Value(&'g Value),
    Ref(NodeId),
}

/// A [`Value`] together with the graph its references resolve against.
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
    graph: Option<&'g Graph>,
    slot: Slot<'g>,
}

impl<'g> Node<'g> {
    fn detached(value: &'g Value) -> Self {
        Node {
            graph: None,
            slot: Slot::Value(value),
        }
    }

    fn child(self, value: &'g Value) -> Child<'g> {
        Child::owned(Node {
            graph: self.graph,
            slot: Slot::Value(value),
        })
    }

    fn name(self) -> Cow<'g, str> {
        let value = match self.slot {
            Slot::Ref(_) => return Cow::Borrowed("ref"),
            Slot::Value(value) => value,
        };
        let name = match value {
            Value::Nil | Value::TypedNil(_) => "nil",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Complex64(_) => std::any::type_name::<Complex<f32>>(),
            Value::Complex128(_) => std::any::type_name::<Complex<f64>>(),
            Value::Char(_) => "char",
            Value::String(_) => std::any::type_name::<String>(),
            Value::Ref(_) => "ref",
            Value::List { type_name, .. } | Value::Map { type_name, .. } => {
                return Cow::Borrowed(type_name.as_str());
            }
            Value::Record { name, .. }
            | Value::Function(name)
            | Value::Channel(name)
            | Value::Opaque(name) => return Cow::Borrowed(name.as_str()),
        };
        Cow::Borrowed(name)
    }

    fn resolve_ref(self, id: NodeId) -> View<'g> {
        match self.graph.and_then(|graph| graph.get(id)) {
            Some(target) => View::Reference(Reference::with_identity(id.identity(), self.child(target))),
            None => View::Unsupported(Cow::Owned(format!("reference to missing node {}", id))),
        }
    }

    fn into_view(self) -> View<'g> {
        let value = match self.slot {
            Slot::Ref(id) => return self.resolve_ref(id),
            Slot::Value(value) => value,
        };
        match value {
            Value::Nil => View::Nil(None),
            Value::TypedNil(name) => View::Nil(Some(Cow::Borrowed(name.as_str()))),
            Value::Bool(v) => View::Bool(*v),
            Value::I8(v) => View::Signed(IntType::I8, i64::from(*v)),
            Value::I16(v) => View::Signed(IntType::I16, i64::from(*v)),
            Value::I32(v) => View::Signed(IntType::I32, i64::from(*v)),
            Value::I64(v) => View::Signed(IntType::I64, *v),
            Value::U8(v) => View::Unsigned(UintType::U8, u64::from(*v)),
            Value::U16(v) => View::Unsigned(UintType::U16, u64::from(*v)),
            Value::U32(v) => View::Unsigned(UintType::U32, u64::from(*v)),
            Value::U64(v) => View::Unsigned(UintType::U64, *v),
            Value::F32(v) => View::Float(FloatType::F32, f64::from(*v)),
            Value::F64(v) => View::Float(FloatType::F64, *v),
            Value::Complex64(c) => View::Complex(FloatType::F32, f64::from(c.re), f64::from(c.im)),
            Value::Complex128(c) => View::Complex(FloatType::F64, c.re, c.im),
            Value::Char(c) => View::Unsigned(UintType::Char, u64::from(*c)),
            Value::String(s) => View::Str(s.as_str()),
            Value::List { items, .. } => {
                View::Sequence(items.iter().map(|item| self.child(item)).collect())
            }
            Value::Map { entries, .. } => View::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (self.child(k), self.child(v)))
                    .collect(),
            ),
            Value::Record {
                name,
                namespace,
                fields,
            } => View::Aggregate(Aggregate {
                name: Cow::Borrowed(name.as_str()),
                namespace: Cow::Borrowed(namespace.as_str()),
                fields: fields
                    .iter()
                    .map(|(field, v)| Field::new(field.as_str(), self.child(v)))
                    .collect(),
            }),
            Value::Ref(id) => self.resolve_ref(*id),
            Value::Function(name) => View::Unsupported(Cow::Owned(format!("function `{}`", name))),
            Value::Channel(name) => View::Unsupported(Cow::Owned(format!("channel `{}`", name))),
            Value::Opaque(name) => {
                View::Unsupported(Cow::Owned(format!("dynamic value `{}` has no concrete type", name)))
            }
        }
    }
}

impl Imprint for Node<'_> {
    fn type_name(&self) -> Cow<'_, str> {
        self.name()
    }

    fn view(&self) -> View<'_> {
        self.into_view()
    }
}

/// A standalone value; any [`Value::Ref`] inside it is unsupported.
/// Use [`Graph::value`] to resolve references.
impl Imprint for Value {
    fn type_name(&self) -> Cow<'_, str> {
        Node::detached(self).name()
    }

    fn view(&self) -> View<'_> {
        Node::detached(self).into_view()
    }
}
