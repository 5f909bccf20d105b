// File: src/model.rs
// Purpose: Traits describing a draft struct and typed access to its fields

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Key identifying one field of a [`FormModel`]
///
/// Automatically implemented for the `<Struct>Field` enum generated by
/// `#[derive(FormModel)]`.
pub trait FieldKey: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Raw field name as written in the struct
    fn name(self) -> &'static str;

    /// Label declared with `#[form(label = "...")]`, if any
    fn label(self) -> Option<&'static str> {
        None
    }
}

/// A struct that can be edited through a [`FormState`](crate::FormState)
pub trait FormModel: Clone {
    type Field: FieldKey;

    /// Every field, in declaration order
    fn fields() -> &'static [Self::Field];

    /// Display text of a field, `None` when the value is absent
    fn field_text(&self, field: Self::Field) -> Option<Cow<'_, str>>;
}

/// Typed accessor for one field of `T`
pub trait FieldLens<T: FormModel>: Copy {
    type Value;

    fn key(self) -> T::Field;
    fn get(self, model: &T) -> &Self::Value;
    fn get_mut(self, model: &mut T) -> &mut Self::Value;

    fn set(self, model: &mut T, value: Self::Value) {
        *self.get_mut(model) = value;
    }
}

/// Function-pointer lens, the form emitted by `#[derive(FormModel)]`
pub struct Lens<T: FormModel, V> {
    key: T::Field,
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
    _value: PhantomData<fn() -> V>,
}

impl<T: FormModel, V> Lens<T, V> {
    pub const fn new(key: T::Field, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self {
            key,
            get,
            get_mut,
            _value: PhantomData,
        }
    }
}

impl<T: FormModel, V> Clone for Lens<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FormModel, V> Copy for Lens<T, V> {}

impl<T: FormModel, V> fmt::Debug for Lens<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lens").field(&self.key).finish()
    }
}

impl<T: FormModel, V> FieldLens<T> for Lens<T, V> {
    type Value = V;

    fn key(self) -> T::Field {
        self.key
    }

    fn get(self, model: &T) -> &V {
        (self.get)(model)
    }

    fn get_mut(self, model: &mut T) -> &mut V {
        (self.get_mut)(model)
    }
}
