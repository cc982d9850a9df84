//! Runtime utilities used by the derived code (macros).
//! Do not use directly.
//!
//! The generated accessor bindings are thin non-capturing closures that
//! downcast the containing struct and delegate here. Helpers never panic:
//! a failed downcast (impossible when the bindings come from the derive)
//! degrades to a benign value or a codec/list error.

use std::any::Any;

use crate::codec::{CodecError, CodecResult, Decoded, WireScalar};
use crate::list::{ListError, WireList};

fn host_mismatch() -> CodecError {
    CodecError::Unsupported("accessor applied to the wrong host type".into())
}

// --- SCALAR FIELDS ---

/// Encodes a plain scalar field.
pub fn encode<S: 'static, T: WireScalar>(
    obj: &dyn Any,
    get: fn(&S) -> &T,
    format: Option<&str>,
) -> CodecResult<Option<String>> {
    let s = obj.downcast_ref::<S>().ok_or_else(host_mismatch)?;
    get(s).encode(format).map(Some)
}

/// Encodes an optional scalar field; `None` encodes as absent.
pub fn encode_opt<S: 'static, T: WireScalar>(
    obj: &dyn Any,
    get: fn(&S) -> &Option<T>,
    format: Option<&str>,
) -> CodecResult<Option<String>> {
    let s = obj.downcast_ref::<S>().ok_or_else(host_mismatch)?;
    match get(s) {
        Some(value) => value.encode(format).map(Some),
        None => Ok(None),
    }
}

/// Encodes a field's declared default value.
pub fn encode_default<T: WireScalar>(
    make: fn() -> T,
    format: Option<&str>,
) -> CodecResult<Option<String>> {
    make().encode(format).map(Some)
}

/// Encodes an optional field's declared default value.
pub fn encode_default_opt<T: WireScalar>(
    make: fn() -> Option<T>,
    format: Option<&str>,
) -> CodecResult<Option<String>> {
    match make() {
        Some(value) => value.encode(format).map(Some),
        None => Ok(None),
    }
}

/// Whether a field currently equals its declared default. Works for plain
/// and optional fields alike (`T` may itself be an `Option`).
pub fn is_default<S: 'static, T: PartialEq>(
    obj: &dyn Any,
    get: fn(&S) -> &T,
    make: fn() -> T,
) -> bool {
    obj.downcast_ref::<S>().is_some_and(|s| *get(s) == make())
}

/// Decodes `text` and assigns it to a plain scalar field. An unknown enum
/// code assigns the declared default; an empty value is an error for a
/// required field.
pub fn assign<S: 'static, T: WireScalar>(
    obj: &mut dyn Any,
    get_mut: fn(&mut S) -> &mut T,
    make_default: fn() -> T,
    text: &str,
) -> CodecResult<()> {
    let s = obj.downcast_mut::<S>().ok_or_else(host_mismatch)?;
    match T::decode(text)? {
        Decoded::Value(value) => {
            *get_mut(s) = value;
            Ok(())
        }
        Decoded::Empty => Err(CodecError::Unparsable("empty value for a required field".into())),
        Decoded::NotFound => {
            *get_mut(s) = make_default();
            Ok(())
        }
    }
}

/// Decodes `text` and assigns it to an optional scalar field; "no value"
/// outcomes assign `None`.
pub fn assign_opt<S: 'static, T: WireScalar>(
    obj: &mut dyn Any,
    get_mut: fn(&mut S) -> &mut Option<T>,
    text: &str,
) -> CodecResult<()> {
    let s = obj.downcast_mut::<S>().ok_or_else(host_mismatch)?;
    *get_mut(s) = match T::decode(text)? {
        Decoded::Value(value) => Some(value),
        Decoded::Empty | Decoded::NotFound => None,
    };
    Ok(())
}

/// [`assign`] through a custom setter.
pub fn assign_with<S: 'static, T: WireScalar>(
    obj: &mut dyn Any,
    set: fn(&mut S, T),
    make_default: fn() -> T,
    text: &str,
) -> CodecResult<()> {
    let s = obj.downcast_mut::<S>().ok_or_else(host_mismatch)?;
    match T::decode(text)? {
        Decoded::Value(value) => {
            set(s, value);
            Ok(())
        }
        Decoded::Empty => Err(CodecError::Unparsable("empty value for a required field".into())),
        Decoded::NotFound => {
            set(s, make_default());
            Ok(())
        }
    }
}

/// [`assign_opt`] through a custom setter.
pub fn assign_with_opt<S: 'static, T: WireScalar>(
    obj: &mut dyn Any,
    set: fn(&mut S, Option<T>),
    text: &str,
) -> CodecResult<()> {
    let s = obj.downcast_mut::<S>().ok_or_else(host_mismatch)?;
    let value = match T::decode(text)? {
        Decoded::Value(value) => Some(value),
        Decoded::Empty | Decoded::NotFound => None,
    };
    set(s, value);
    Ok(())
}

/// Assigns a field's declared default directly.
pub fn assign_default<S: 'static, T>(obj: &mut dyn Any, get_mut: fn(&mut S) -> &mut T, make: fn() -> T) {
    if let Some(s) = obj.downcast_mut::<S>() {
        *get_mut(s) = make();
    }
}

/// Assigns a field's declared default through a custom setter.
pub fn assign_default_with<S: 'static, T>(obj: &mut dyn Any, set: fn(&mut S, T), make: fn() -> T) {
    if let Some(s) = obj.downcast_mut::<S>() {
        set(s, make());
    }
}

/// Whether a plain scalar field currently holds what `text` decodes to.
pub fn agrees<S: 'static, T: WireScalar + PartialEq>(
    obj: &dyn Any,
    get: fn(&S) -> &T,
    make_default: fn() -> T,
    text: &str,
) -> CodecResult<bool> {
    let s = obj.downcast_ref::<S>().ok_or_else(host_mismatch)?;
    match T::decode(text)? {
        Decoded::Value(value) => Ok(*get(s) == value),
        Decoded::Empty => Err(CodecError::Unparsable("empty value for a required field".into())),
        Decoded::NotFound => Ok(*get(s) == make_default()),
    }
}

/// Whether an optional scalar field currently holds what `text` decodes
/// to.
pub fn agrees_opt<S: 'static, T: WireScalar + PartialEq>(
    obj: &dyn Any,
    get: fn(&S) -> &Option<T>,
    text: &str,
) -> CodecResult<bool> {
    let s = obj.downcast_ref::<S>().ok_or_else(host_mismatch)?;
    Ok(match T::decode(text)? {
        Decoded::Value(value) => get(s).as_ref() == Some(&value),
        Decoded::Empty | Decoded::NotFound => get(s).is_none(),
    })
}

// --- OBJECT AND LIST INSTALLATION ---

/// Stores a decision-constructed value into an optional slot. Returns
/// `false` when the boxed value is not of the slot's type.
pub fn install<S: 'static, T: 'static>(
    obj: &mut dyn Any,
    slot: fn(&mut S) -> &mut Option<T>,
    value: Box<dyn Any>,
) -> bool {
    let Some(s) = obj.downcast_mut::<S>() else {
        return false;
    };
    match value.downcast::<T>() {
        Ok(v) => {
            *slot(s) = Some(*v);
            true
        }
        Err(_) => false,
    }
}

// --- LIST FIELDS ---
// Projections return `Option<&L>` so plain and optional list fields share
// one set of helpers; a plain field projects `Some(&self.field)`.

/// Current element count; 0 when the collection is absent.
pub fn list_len<S: 'static, L: WireList<E>, E>(obj: &dyn Any, get: fn(&S) -> Option<&L>) -> usize {
    obj.downcast_ref::<S>().and_then(get).map_or(0, WireList::len)
}

/// Appends one slot filled from `seed` (a decision-constructed element)
/// or from the element type's default constructor.
pub fn list_expand<S: 'static, L: WireList<E>, E: 'static>(
    obj: &mut dyn Any,
    get_mut: fn(&mut S) -> Option<&mut L>,
    make: Option<fn() -> E>,
    seed: Option<Box<dyn Any>>,
) -> Result<(), ListError> {
    let Some(list) = obj.downcast_mut::<S>().and_then(get_mut) else {
        return Err(ListError::Mismatch);
    };
    let element = match seed {
        Some(boxed) => *boxed.downcast::<E>().map_err(|_| ListError::Mismatch)?,
        None => match make {
            Some(ctor) => ctor(),
            None => return Err(ListError::NoConstructor),
        },
    };
    list.try_push(element)
}

/// Shrinks a collection back to `len`. Rollback of [`list_expand`].
pub fn list_truncate<S: 'static, L: WireList<E>, E>(
    obj: &mut dyn Any,
    get_mut: fn(&mut S) -> Option<&mut L>,
    len: usize,
) {
    if let Some(list) = obj.downcast_mut::<S>().and_then(get_mut) {
        list.undo_truncate(len);
    }
}

/// Encodes the scalar element at `index`; `Ok(None)` when out of range.
pub fn elem_encode<S: 'static, L: WireList<E>, E: WireScalar>(
    obj: &dyn Any,
    get: fn(&S) -> Option<&L>,
    index: usize,
    format: Option<&str>,
) -> CodecResult<Option<String>> {
    match obj.downcast_ref::<S>().and_then(get).and_then(|l| l.get(index)) {
        Some(element) => element.encode(format).map(Some),
        None => Ok(None),
    }
}

/// Decodes `text` into the scalar element at `index` through the
/// collection's guarded assignment path. An unknown enum code leaves the
/// default-constructed slot untouched.
pub fn elem_assign<S: 'static, L: WireList<E>, E: WireScalar>(
    obj: &mut dyn Any,
    get_mut: fn(&mut S) -> Option<&mut L>,
    index: usize,
    text: &str,
) -> Result<(), ListError> {
    let Some(list) = obj.downcast_mut::<S>().and_then(get_mut) else {
        return Err(ListError::Mismatch);
    };
    match E::decode(text).map_err(ListError::Codec)? {
        Decoded::Value(value) => list.try_set(index, value),
        Decoded::Empty => Err(ListError::Codec(CodecError::Unparsable(
            "empty value for a collection element".into(),
        ))),
        Decoded::NotFound => Ok(()),
    }
}

/// Borrows the object element at `index`.
pub fn elem_object<'a, S: 'static, L: WireList<E> + 'a, E: crate::WireObject>(
    obj: &'a dyn Any,
    get: fn(&S) -> Option<&L>,
    index: usize,
) -> Option<&'a dyn crate::WireObject> {
    obj.downcast_ref::<S>()
        .and_then(get)
        .and_then(|l| l.get(index))
        .map(|e| e as &dyn crate::WireObject)
}

/// Mutably borrows the object element at `index`.
pub fn elem_object_mut<'a, S: 'static, L: WireList<E> + 'a, E: crate::WireObject>(
    obj: &'a mut dyn Any,
    get_mut: fn(&mut S) -> Option<&mut L>,
    index: usize,
) -> Option<&'a mut dyn crate::WireObject> {
    obj.downcast_mut::<S>()
        .and_then(get_mut)
        .and_then(|l| l.get_mut(index))
        .map(|e| e as &mut dyn crate::WireObject)
}
