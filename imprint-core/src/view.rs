use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::guard::Identity;
use crate::imprint::Imprint;
use crate::kind::{FloatType, IntType, Kind, UintType};

/// A child value exposed by a [`View`], either borrowed from the parent or
/// materialized on the fly (e.g. a graph node handle or a borrow guard).
pub enum Child<'a> {
    Borrowed(&'a dyn Imprint),
    Owned(Box<dyn Imprint + 'a>),
}

impl<'a> Child<'a> {
    pub fn owned(value: impl Imprint + 'a) -> Self {
        Child::Owned(Box::new(value))
    }
}

impl<'a> Deref for Child<'a> {
    type Target = dyn Imprint + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Child::Borrowed(value) => *value,
            Child::Owned(value) => value.as_ref(),
        }
    }
}

impl<'a, T: Imprint> From<&'a T> for Child<'a> {
    fn from(value: &'a T) -> Self {
        Child::Borrowed(value)
    }
}

impl fmt::Debug for Child<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Child({})", self.type_name())
    }
}

/// A non-nil reference to another value.
///
/// References are transparent: they encode exactly like their target. When an
/// identity is present the target is entered at most once per computation.
#[derive(Debug)]
pub struct Reference<'a> {
    pub identity: Option<Identity>,
    pub target: Child<'a>,
}

impl<'a> Reference<'a> {
    pub fn to(target: impl Into<Child<'a>>) -> Self {
        Reference {
            identity: None,
            target: target.into(),
        }
    }

    pub fn with_identity(identity: Identity, target: impl Into<Child<'a>>) -> Self {
        Reference {
            identity: Some(identity),
            target: target.into(),
        }
    }
}

/// A declared member of an aggregate.
#[derive(Debug)]
pub struct Field<'a> {
    /// Used for error context only; member names are not hashed.
    pub name: Cow<'a, str>,
    pub value: Child<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Child<'a>>) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A record-like value with a fixed, declared list of members.
#[derive(Debug)]
pub struct Aggregate<'a> {
    /// Fully-qualified type name.
    pub name: Cow<'a, str>,
    /// Module or package the type is declared in.
    pub namespace: Cow<'a, str>,
    pub fields: Vec<Field<'a>>,
}

impl<'a> Aggregate<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, namespace: impl Into<Cow<'a, str>>) -> Self {
        Aggregate {
            name: name.into(),
            namespace: namespace.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Child<'a>>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }
}

/// One level of structure of a value, as seen by the encoder.
#[derive(Debug)]
pub enum View<'a> {
    /// A nil reference, carrying the declared pointee type when it is concrete.
    Nil(Option<Cow<'a, str>>),
    Unsigned(UintType, u64),
    Signed(IntType, i64),
    Float(FloatType, f64),
    Complex(FloatType, f64, f64),
    Bool(bool),
    Str(&'a str),
    /// Elements in their significant order.
    Sequence(Vec<Child<'a>>),
    /// Entries in arbitrary order; the encoder sorts them.
    Mapping(Vec<(Child<'a>, Child<'a>)>),
    Aggregate(Aggregate<'a>),
    /// Text rendering chosen by the type in place of structural descent.
    Rendered(String),
    Reference(Reference<'a>),
    Unsupported(Cow<'a, str>),
}

impl View<'_> {
    /// Returns the kind of this view, or `None` for references that still need resolving.
    pub fn kind(&self) -> Option<Kind> {
        let kind = match self {
            View::Nil(_) => Kind::Nil,
            View::Unsigned(..) => Kind::UnsignedInteger,
            View::Signed(..) => Kind::SignedInteger,
            View::Float(..) => Kind::Float,
            View::Complex(..) => Kind::Complex,
            View::Bool(_) => Kind::Boolean,
            View::Str(_) | View::Rendered(_) => Kind::String,
            View::Sequence(_) => Kind::Sequence,
            View::Mapping(_) => Kind::Mapping,
            View::Aggregate(_) => Kind::Aggregate,
            View::Unsupported(_) => Kind::Unsupported,
            View::Reference(_) => return None,
        };
        Some(kind)
    }
}
