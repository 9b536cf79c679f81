//! Partial-update merge engine.
//!
//! A partial update is a value of the same record type as the stored entity in
//! which every field left at its zero value means "not supplied". Merging folds
//! the supplied fields onto the stored entity:
//!
//! - non-`pub` fields and `#[patch(skip)]` fields are never touched,
//! - zero-valued source fields are skipped,
//! - `Option<T>` fields allocate a detached copy when the destination is `None`
//!   and take the source value as-is when both are `Some` and differ
//!   (for `Arc`/`Rc` the latter shares the source's allocation),
//! - nested records recurse with the same rules,
//! - everything else is overwritten when it differs; containers are replaced
//!   wholesale.
//!
//! Record types get their merge from `#[derive(Patch)]`. [`patch_struct`] is
//! the dynamic entry point for callers that only hold type-erased values.

use crate::error::PatchError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Structural kind of a reflected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Strings, numbers, booleans, ids and temporal values.
    Scalar,
    /// Sequences and maps.
    Container,
    /// Nullable or pointer-like values.
    Reference,
    /// A type deriving `Patch`.
    Record,
}

/// Minimal runtime introspection used by [`patch_struct`].
pub trait Reflect: Any {
    /// Structural kind of this value.
    fn kind(&self) -> Kind;

    /// Upcast used for type checks and downcasts.
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Mutable access to the value behind a reference, if it is non-null and
    /// not shared.
    fn referent_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }

    /// Merge `src` into `self`. Only records implement this.
    ///
    /// # Errors
    /// Returns `PatchError::DestinationNotRecord` for non-records and
    /// `PatchError::TypeMismatch` if `src` is a different record type.
    fn patch_reflect(&mut self, _src: &dyn Reflect) -> Result<(), PatchError> {
        Err(PatchError::DestinationNotRecord(self.type_name()))
    }
}

/// A record that can fold a partial update onto itself.
pub trait Patch: Reflect {
    /// Fold the supplied fields of `src` onto `self`.
    fn patch(&mut self, src: &Self);
}

/// Merge policy for a single field type.
pub trait PatchField {
    /// Merge `src` into `self` when `src` counts as supplied.
    fn patch_field(&mut self, src: &Self);

    /// Fresh copy used when an empty `Option` receives a value.
    #[must_use]
    fn detach(&self) -> Self
    where
        Self: Sized + Clone,
    {
        self.clone()
    }
}

/// Merge `src` into the record behind `dst`.
///
/// Preconditions are checked in order and the destination is left untouched
/// when one fails.
///
/// # Errors
/// - `SourceNotRecord` if `src` is not a record,
/// - `DestinationNotReference` if `dst` is `None` or a shared pointer,
/// - `DestinationNotRecord` if `dst` does not lead to a record,
/// - `TypeMismatch` if the two records differ in type.
pub fn patch_struct(dst: &mut dyn Reflect, src: &dyn Reflect) -> Result<(), PatchError> {
    if src.kind() != Kind::Record {
        return Err(PatchError::SourceNotRecord(src.type_name()));
    }

    let dst_name = dst.type_name();
    let target = match dst.kind() {
        Kind::Record => dst,
        Kind::Reference => dst
            .referent_mut()
            .ok_or(PatchError::DestinationNotReference(dst_name))?,
        Kind::Scalar | Kind::Container => {
            return Err(PatchError::DestinationNotRecord(dst_name));
        }
    };

    if target.kind() != Kind::Record {
        return Err(PatchError::DestinationNotRecord(target.type_name()));
    }

    if target.as_any().type_id() != src.as_any().type_id() {
        return Err(PatchError::TypeMismatch {
            expected: target.type_name(),
            found: src.type_name(),
        });
    }

    target.patch_reflect(src)
}

fn follow(value: &mut dyn Reflect) -> Option<&mut dyn Reflect> {
    if value.kind() == Kind::Reference {
        value.referent_mut()
    } else {
        Some(value)
    }
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl PatchField for $ty {
            fn patch_field(&mut self, src: &Self) {
                if *src != <$ty>::default() && self != src {
                    self.clone_from(src);
                }
            }
        }

        impl Reflect for $ty {
            fn kind(&self) -> Kind {
                Kind::Scalar
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    )*};
}

scalar!(
    String,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    Uuid,
    DateTime<Utc>,
    NaiveDate,
    NaiveDateTime,
);

// Floats are zero only when every bit is zero, so `-0.0` counts as supplied.
macro_rules! float {
    ($($ty:ty),* $(,)?) => {$(
        impl PatchField for $ty {
            fn patch_field(&mut self, src: &Self) {
                if src.to_bits() != 0 && self.to_bits() != src.to_bits() {
                    *self = *src;
                }
            }
        }

        impl Reflect for $ty {
            fn kind(&self) -> Kind {
                Kind::Scalar
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    )*};
}

float!(f32, f64);

impl<T: Clone + PartialEq> PatchField for Vec<T> {
    fn patch_field(&mut self, src: &Self) {
        if !src.is_empty() && self != src {
            self.clone_from(src);
        }
    }
}

impl<K, V, S> PatchField for HashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
    S: BuildHasher + Clone,
{
    fn patch_field(&mut self, src: &Self) {
        if !src.is_empty() && self != src {
            self.clone_from(src);
        }
    }
}

impl<K: Ord + Clone, V: PartialEq + Clone> PatchField for BTreeMap<K, V> {
    fn patch_field(&mut self, src: &Self) {
        if !src.is_empty() && self != src {
            self.clone_from(src);
        }
    }
}

impl<T: 'static> Reflect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<K: 'static, V: 'static, S: 'static> Reflect for HashMap<K, V, S> {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<K: 'static, V: 'static> Reflect for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Container
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: PatchField + Clone + PartialEq> PatchField for Option<T> {
    fn patch_field(&mut self, src: &Self) {
        let Some(incoming) = src else {
            return;
        };

        match self {
            None => *self = Some(incoming.detach()),
            Some(current) => {
                if current != incoming {
                    current.clone_from(incoming);
                }
            }
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn referent_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().and_then(|inner| follow(inner))
    }
}

// A box owns its value, so it merges through to whatever it holds.
impl<T: PatchField> PatchField for Box<T> {
    fn patch_field(&mut self, src: &Self) {
        T::patch_field(self, src);
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn referent_mut(&mut self) -> Option<&mut dyn Reflect> {
        follow(&mut **self)
    }
}

macro_rules! shared_pointer {
    ($($ptr:ident),* $(,)?) => {$(
        impl<T: Clone + PartialEq> PatchField for $ptr<T> {
            fn patch_field(&mut self, src: &Self) {
                if self != src {
                    self.clone_from(src);
                }
            }

            fn detach(&self) -> Self {
                $ptr::new(T::clone(self))
            }
        }

        impl<T: Reflect> Reflect for $ptr<T> {
            fn kind(&self) -> Kind {
                Kind::Reference
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn referent_mut(&mut self) -> Option<&mut dyn Reflect> {
                $ptr::get_mut(self).and_then(|inner| follow(inner))
            }
        }
    )*};
}

shared_pointer!(Arc, Rc);
