use serde::{Deserialize, Serialize};

/// Structural classification of a value after indirections are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Nil,
    UnsignedInteger,
    SignedInteger,
    Float,
    Complex,
    Boolean,
    String,
    Sequence,
    Mapping,
    Aggregate,
    Unsupported,
}

/// Leading byte written before every tagged encoding.
///
/// Tags are finer than [`Kind`]: `42u8` and `42u64` carry different tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Tag {
    Bool = 1,
    I8 = 2,
    I16 = 3,
    I32 = 4,
    I64 = 5,
    Isize = 6,
    U8 = 7,
    U16 = 8,
    U32 = 9,
    U64 = 10,
    Usize = 11,
    Char = 12,
    F32 = 13,
    F64 = 14,
    Complex64 = 15,
    Complex128 = 16,
    Str = 17,
    Sequence = 18,
    Mapping = 19,
    Aggregate = 20,
    Rendered = 21,
    Nil = 22,
}

impl Tag {
    pub(crate) fn byte(self) -> u8 {
        self as u8
    }
}

/// Signed integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntType {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

impl IntType {
    pub(crate) fn tag(self) -> Tag {
        match self {
            IntType::I8 => Tag::I8,
            IntType::I16 => Tag::I16,
            IntType::I32 => Tag::I32,
            IntType::I64 => Tag::I64,
            IntType::Isize => Tag::Isize,
        }
    }
}

/// Unsigned integer widths. `char` is hashed as its scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UintType {
    U8,
    U16,
    U32,
    U64,
    Usize,
    Char,
}

impl UintType {
    pub(crate) fn tag(self) -> Tag {
        match self {
            UintType::U8 => Tag::U8,
            UintType::U16 => Tag::U16,
            UintType::U32 => Tag::U32,
            UintType::U64 => Tag::U64,
            UintType::Usize => Tag::Usize,
            UintType::Char => Tag::Char,
        }
    }
}

/// Floating-point widths, also used for the parts of complex numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatType {
    F32,
    F64,
}

impl FloatType {
    pub(crate) fn tag(self) -> Tag {
        match self {
            FloatType::F32 => Tag::F32,
            FloatType::F64 => Tag::F64,
        }
    }

    pub(crate) fn complex_tag(self) -> Tag {
        match self {
            FloatType::F32 => Tag::Complex64,
            FloatType::F64 => Tag::Complex128,
        }
    }
}
