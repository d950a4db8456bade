use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::kind::{FloatType, IntType, UintType};
use crate::view::{Aggregate, Child, Reference, View};

/// A value that can be hashed structurally.
///
/// Implementing `Imprint` is how a type registers its shape with the encoder:
/// it reports its concrete type name and exposes one level of structure via
/// [`View`]. Types without an implementation (closures, function pointers,
/// channels, OS handles) are rejected at compile time.
///
/// Most types should use `#[derive(Imprint)]`.
pub trait Imprint {
    /// Fully-qualified name of the concrete type.
    ///
    /// Called through `dyn Imprint`, so the concrete type survives indirection.
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Returns one level of structure of this value.
    fn view(&self) -> View<'_>;
}

/// Borrowed handle that lets unsized pointees (`str`, `[T]`, `dyn Imprint`)
/// be exposed as a child.
struct Pointee<'a, T: ?Sized>(&'a T);

impl<T: Imprint + ?Sized> Imprint for Pointee<'_, T> {
    fn type_name(&self) -> Cow<'_, str> {
        self.0.type_name()
    }

    fn view(&self) -> View<'_> {
        self.0.view()
    }
}

fn reference_to<T: Imprint + ?Sized>(target: &T) -> View<'_> {
    View::Reference(Reference {
        identity: None,
        target: Child::owned(Pointee(target)),
    })
}

// Primitive implementations

macro_rules! impl_imprint_signed {
    ($t:ty, $variant:ident) => {
        impl Imprint for $t {
            fn view(&self) -> View<'_> {
                View::Signed(IntType::$variant, *self as i64)
            }
        }
    };
}

impl_imprint_signed!(i8, I8);
impl_imprint_signed!(i16, I16);
impl_imprint_signed!(i32, I32);
impl_imprint_signed!(i64, I64);
impl_imprint_signed!(isize, Isize);

macro_rules! impl_imprint_unsigned {
    ($t:ty, $variant:ident) => {
        impl Imprint for $t {
            fn view(&self) -> View<'_> {
                View::Unsigned(UintType::$variant, *self as u64)
            }
        }
    };
}

impl_imprint_unsigned!(u8, U8);
impl_imprint_unsigned!(u16, U16);
impl_imprint_unsigned!(u32, U32);
impl_imprint_unsigned!(u64, U64);
impl_imprint_unsigned!(usize, Usize);
impl_imprint_unsigned!(char, Char);

impl Imprint for f32 {
    fn view(&self) -> View<'_> {
        View::Float(FloatType::F32, f64::from(*self))
    }
}

impl Imprint for f64 {
    fn view(&self) -> View<'_> {
        View::Float(FloatType::F64, *self)
    }
}

impl Imprint for bool {
    fn view(&self) -> View<'_> {
        View::Bool(*self)
    }
}

/// A complex number, hashed as its real and imaginary parts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Complex { re, im }
    }
}

impl Imprint for Complex<f32> {
    fn view(&self) -> View<'_> {
        View::Complex(FloatType::F32, f64::from(self.re), f64::from(self.im))
    }
}

impl Imprint for Complex<f64> {
    fn view(&self) -> View<'_> {
        View::Complex(FloatType::F64, self.re, self.im)
    }
}

// Strings

impl Imprint for str {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

impl Imprint for String {
    fn view(&self) -> View<'_> {
        View::Str(self.as_str())
    }
}

impl Imprint for Cow<'_, str> {
    fn view(&self) -> View<'_> {
        View::Str(self.as_ref())
    }
}

// Sequences

impl<T: Imprint> Imprint for [T] {
    fn view(&self) -> View<'_> {
        View::Sequence(self.iter().map(Child::from).collect())
    }
}

impl<T: Imprint, const N: usize> Imprint for [T; N] {
    fn view(&self) -> View<'_> {
        View::Sequence(self.iter().map(Child::from).collect())
    }
}

impl<T: Imprint> Imprint for Vec<T> {
    fn view(&self) -> View<'_> {
        View::Sequence(self.iter().map(Child::from).collect())
    }
}

impl<T: Imprint> Imprint for VecDeque<T> {
    fn view(&self) -> View<'_> {
        View::Sequence(self.iter().map(Child::from).collect())
    }
}

// Maps. Sets are maps to unit.

const UNIT: &() = &();

impl<K: Imprint, V: Imprint, S> Imprint for HashMap<K, V, S> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|(k, v)| (Child::from(k), Child::from(v))).collect())
    }
}

impl<K: Imprint, V: Imprint> Imprint for BTreeMap<K, V> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|(k, v)| (Child::from(k), Child::from(v))).collect())
    }
}

impl<K: Imprint, V: Imprint, S> Imprint for IndexMap<K, V, S> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|(k, v)| (Child::from(k), Child::from(v))).collect())
    }
}

impl<T: Imprint, S> Imprint for HashSet<T, S> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|k| (Child::from(k), Child::from(UNIT))).collect())
    }
}

impl<T: Imprint> Imprint for BTreeSet<T> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|k| (Child::from(k), Child::from(UNIT))).collect())
    }
}

impl<T: Imprint, S> Imprint for IndexSet<T, S> {
    fn view(&self) -> View<'_> {
        View::Mapping(self.iter().map(|k| (Child::from(k), Child::from(UNIT))).collect())
    }
}

// Indirections

/// Returns the name a nil of pointee `T` writes, or `None` when the pointee
/// is a trait object (possibly behind further pointers) and has no concrete type.
fn pointee_name<T: ?Sized>() -> Option<Cow<'static, str>> {
    const POINTERS: [&str; 4] = [
        "alloc::boxed::Box<",
        "alloc::rc::Rc<",
        "alloc::sync::Arc<",
        "core::option::Option<",
    ];

    let name = std::any::type_name::<T>();
    let mut rest = name;
    loop {
        if rest.starts_with("dyn ") {
            return None;
        }
        rest = if let Some(inner) = rest.strip_prefix("&mut ") {
            inner
        } else if let Some(inner) = rest.strip_prefix('&') {
            inner
        } else if let Some(inner) = POINTERS.iter().find_map(|p| rest.strip_prefix(p)) {
            inner
        } else {
            return Some(Cow::Borrowed(name));
        };
    }
}

impl<T: Imprint> Imprint for Option<T> {
    fn view(&self) -> View<'_> {
        match self {
            Some(value) => View::Reference(Reference::to(value)),
            None => View::Nil(pointee_name::<T>()),
        }
    }
}

impl<T: Imprint + ?Sized> Imprint for &T {
    fn view(&self) -> View<'_> {
        reference_to(&**self)
    }
}

impl<T: Imprint + ?Sized> Imprint for &mut T {
    fn view(&self) -> View<'_> {
        reference_to(&**self)
    }
}

impl<T: Imprint + ?Sized> Imprint for Box<T> {
    fn view(&self) -> View<'_> {
        reference_to(&**self)
    }
}

impl<T: Imprint + ?Sized> Imprint for Rc<T> {
    fn view(&self) -> View<'_> {
        reference_to(&**self)
    }
}

impl<T: Imprint + ?Sized> Imprint for Arc<T> {
    fn view(&self) -> View<'_> {
        reference_to(&**self)
    }
}

// Tuples are anonymous aggregates.

impl Imprint for () {
    fn view(&self) -> View<'_> {
        View::Aggregate(Aggregate::new("()", ""))
    }
}

macro_rules! impl_imprint_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Imprint),+> Imprint for ($($name,)+) {
            fn view(&self) -> View<'_> {
                View::Aggregate(
                    Aggregate::new(std::any::type_name::<Self>(), "")
                        $(.field(stringify!($idx), &self.$idx))+
                )
            }
        }
    };
}

impl_imprint_tuple!(A 0);
impl_imprint_tuple!(A 0, B 1);
impl_imprint_tuple!(A 0, B 1, C 2);
impl_imprint_tuple!(A 0, B 1, C 2, D 3);
impl_imprint_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_imprint_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_imprint_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_imprint_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn primitives_report_rust_type_names() {
        assert_eq!(42i64.type_name(), "i64");
        assert_eq!(42u8.type_name(), "u8");
        assert_eq!(String::new().type_name(), "alloc::string::String");
        assert_eq!(<Vec<u8>>::new().type_name(), "alloc::vec::Vec<u8>");
    }

    #[test]
    fn option_none_keeps_pointee() {
        let none: Option<i32> = None;
        match none.view() {
            View::Nil(Some(name)) => assert_eq!(name, "i32"),
            other => panic!("Expected typed nil, got {:?}", other),
        }
    }

    #[test]
    fn option_none_of_trait_object_is_untyped() {
        let none: Option<Box<dyn Imprint>> = None;
        assert!(matches!(none.view(), View::Nil(None)));
        let none: Option<&dyn Imprint> = None;
        assert!(matches!(none.view(), View::Nil(None)));
        let none: Option<Option<std::rc::Rc<dyn Imprint>>> = None;
        assert!(matches!(none.view(), View::Nil(None)));
    }

    #[test]
    fn option_none_of_concrete_pointer_keeps_name() {
        let none: Option<Box<u8>> = None;
        match none.view() {
            View::Nil(Some(name)) => assert_eq!(name, "alloc::boxed::Box<u8>"),
            other => panic!("Expected typed nil, got {:?}", other),
        }
        let none: Option<Vec<Box<dyn Imprint>>> = None;
        assert!(matches!(none.view(), View::Nil(Some(_))));
    }

    #[test]
    fn box_is_a_reference_to_its_target() {
        let boxed: Box<dyn Imprint> = Box::new(3u16);
        match boxed.view() {
            View::Reference(r) => {
                assert!(r.identity.is_none());
                assert_eq!(r.target.type_name(), "u16");
            }
            other => panic!("Expected reference, got {:?}", other),
        }
    }

    #[test]
    fn unsized_pointees_are_supported() {
        let s: &str = "abc";
        match Imprint::view(&s) {
            View::Reference(r) => assert_eq!(r.target.view().kind(), Some(Kind::String)),
            other => panic!("Expected reference, got {:?}", other),
        }
    }

    #[test]
    fn tuple_is_an_aggregate() {
        let pair = (1u8, "x".to_string());
        match pair.view() {
            View::Aggregate(agg) => {
                assert_eq!(agg.fields.len(), 2);
                assert_eq!(agg.fields[1].name, "1");
            }
            other => panic!("Expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn sets_are_maps_to_unit() {
        let set: BTreeSet<u8> = [1, 2].into_iter().collect();
        match set.view() {
            View::Mapping(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].1.type_name(), "()");
            }
            other => panic!("Expected mapping, got {:?}", other),
        }
    }
}
