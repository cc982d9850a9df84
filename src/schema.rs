//! Static descriptor tables: the compile-time metadata every conversion
//! runs on.
//!
//! Where a reflective runtime would discover fields and accessors on the
//! fly, Wiremap types carry a [`Schema`] — a `'static` table of
//! [`FieldDef`] entries whose accessor bindings are plain `fn` pointers
//! captured once per field. `#[derive(WireObject)]` generates these
//! tables; they can also be authored by hand against the types in this
//! module.
//!
//! A [`FieldShape`] classifies each field for dispatch: scalar fields
//! encode and decode through the value codec, object fields recurse,
//! list fields expand and iterate, and dictionary fields fail loudly.

use std::any::Any;

use crate::codec::CodecResult;
use crate::context::LoadContext;
use crate::list::ListError;

/// A type that can be saved to and loaded from a wire collection.
///
/// Usually implemented via `#[derive(WireObject)]`. The trait is
/// object-safe; the engines walk object graphs through `&dyn WireObject`.
///
/// Polymorphic fields (`Option<Box<dyn Trait>>`) require the trait to
/// declare `WireObject` as a supertrait so elements can be upcast.
pub trait WireObject: Any {
    /// The descriptor table for this concrete type.
    fn schema(&self) -> &'static Schema;

    /// Upcast for accessor dispatch.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for accessor dispatch.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Descriptor table of one convertible type.
#[derive(Debug)]
pub struct Schema {
    /// Human-readable type name, used in diagnostics.
    pub type_name: &'static str,
    /// One entry per convertible field, in declaration order. The
    /// metadata cache re-sorts by save order.
    pub fields: &'static [FieldDef],
}

/// Declarative configuration and accessor bindings of one field.
pub struct FieldDef {
    /// Rust identifier of the field, for diagnostics.
    pub field_name: &'static str,
    /// Wire name, possibly containing `{Placeholder}` tokens resolved
    /// from context bindings. Scalar fields default to the Rust name.
    pub wire_name: Option<&'static str>,
    /// Optional format spec forwarded to the value codec.
    pub value_format: Option<&'static str>,
    /// Regex recognizing wire keys that load into this field. Collection
    /// patterns must declare a capture group named [`FieldDef::key_name`].
    pub name_pattern: Option<&'static str>,
    /// Name of the per-element binding this field publishes while its
    /// elements are visited (the loop index, textually).
    pub key_name: Option<&'static str>,
    /// Write the field even when its value equals the default.
    pub write_default: bool,
    /// Treat an empty wire value as absent (load the default; elide empty
    /// saves). Defaults to `true` in the derive.
    pub empty_ignore: bool,
    /// Stable sort key for save order; negative values save first.
    pub save_order: f32,
    /// Shape-specific accessor bindings.
    pub shape: FieldShape,
    /// Ordered type decisions for populating the field itself.
    pub decisions: &'static [TypeDecision],
    /// Ordered type decisions for constructing collection elements.
    pub element_decisions: &'static [TypeDecision],
}

impl std::fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("field_name", &self.field_name)
            .field("wire_name", &self.wire_name)
            .field("name_pattern", &self.name_pattern)
            .field("save_order", &self.save_order)
            .finish_non_exhaustive()
    }
}

/// Dispatch class of a field, with its accessor bindings.
pub enum FieldShape {
    /// Encodes and decodes through the value codec.
    Scalar(ScalarOps),
    /// A nested object the engines recurse into.
    Object(ObjectOps),
    /// An indexable collection of scalars or objects.
    List(ListOps),
    /// Map-shaped fields are rejected on save and load.
    Dictionary,
}

/// Accessor bindings of a scalar field.
///
/// All functions receive the *containing* struct as `dyn Any` and project
/// into the field internally. Assignment ops are absent on read-only
/// fields; that absence is what the post-load validation reports as
/// "no setter".
pub struct ScalarOps {
    /// Encodes the current value. `Ok(None)` means the value is absent
    /// (an `Option` field holding `None`) and nothing should be written.
    pub encode: fn(&dyn Any, Option<&str>) -> CodecResult<Option<String>>,
    /// Encodes the declared default value.
    pub encode_default: fn(Option<&str>) -> CodecResult<Option<String>>,
    /// Whether the current value equals the declared default.
    pub is_default: fn(&dyn Any) -> bool,
    /// Decodes `text` and assigns it. `None` on read-only fields.
    pub assign: Option<fn(&mut dyn Any, &str) -> CodecResult<()>>,
    /// Assigns the declared default. `None` on read-only fields.
    pub assign_default: Option<fn(&mut dyn Any)>,
    /// Whether the current value equals what `text` decodes to. Drives
    /// the deferred post-load validation.
    pub agrees: fn(&dyn Any, &str) -> CodecResult<bool>,
}

/// Accessor bindings of a nested-object field.
pub struct ObjectOps {
    /// Whether the field currently holds a value. Non-optional fields
    /// always do.
    pub present: fn(&dyn Any) -> bool,
    /// Borrows the nested object, if present.
    pub get: fn(&dyn Any) -> Option<&dyn WireObject>,
    /// Mutably borrows the nested object, if present.
    pub get_mut: fn(&mut dyn Any) -> Option<&mut dyn WireObject>,
    /// Stores a freshly constructed value produced by a type decision.
    /// Returns `false` if the boxed value is not of the field's type.
    /// `None` on fields that can never be empty.
    pub install: Option<fn(&mut dyn Any, Box<dyn Any>) -> bool>,
    /// Constructor for the field's statically declared type, when that
    /// type is default-constructible.
    pub make_default: Option<fn() -> Box<dyn Any>>,
    /// Resets the field to empty; the rollback of `install`.
    pub clear: Option<fn(&mut dyn Any)>,
}

/// Accessor bindings of a list field.
pub struct ListOps {
    /// Whether the field currently holds a collection.
    pub present: fn(&dyn Any) -> bool,
    /// Stores a freshly constructed collection (optional-list fields).
    pub install: Option<fn(&mut dyn Any, Box<dyn Any>) -> bool>,
    /// Constructor for the statically declared collection type.
    pub make_default: Option<fn() -> Box<dyn Any>>,
    /// Resets the field to empty; the rollback of `install`.
    pub clear: Option<fn(&mut dyn Any)>,
    /// Current element count (0 when absent).
    pub len: fn(&dyn Any) -> usize,
    /// Whether the collection can grow. Fixed-size arrays cannot.
    pub can_expand: bool,
    /// Appends one slot, filled from the boxed element when given, else
    /// from the element type's default constructor.
    pub expand: fn(&mut dyn Any, Option<Box<dyn Any>>) -> Result<(), ListError>,
    /// Shrinks back to `len`; the rollback of `expand`. Unguarded by
    /// design — rollback restores a state that was already approved.
    pub truncate: fn(&mut dyn Any, usize),
    /// Element dispatch.
    pub element: ElementShape,
}

/// Dispatch class of a list's elements.
pub enum ElementShape {
    /// Elements encode and decode through the value codec.
    Scalar(ScalarElementOps),
    /// Elements are nested objects the engines recurse into.
    Object(ObjectElementOps),
}

/// Accessor bindings for scalar list elements.
pub struct ScalarElementOps {
    /// Encodes the element at `index`. `Ok(None)` when out of range.
    pub encode: fn(&dyn Any, usize, Option<&str>) -> CodecResult<Option<String>>,
    /// Decodes `text` and assigns it at `index`, through the collection's
    /// guarded assignment path.
    pub assign: fn(&mut dyn Any, usize, &str) -> Result<(), ListError>,
}

/// Accessor bindings for object list elements.
pub struct ObjectElementOps {
    /// Borrows the element at `index`.
    pub get: fn(&dyn Any, usize) -> Option<&dyn WireObject>,
    /// Mutably borrows the element at `index`.
    pub get_mut: fn(&mut dyn Any, usize) -> Option<&mut dyn WireObject>,
}

/// One entry of an ordered type-decision chain.
///
/// Decisions pick the concrete type to construct for a polymorphic field
/// or collection element. They are evaluated in ascending
/// [`TypeDecision::index`] order, only when the field (or slot) currently
/// holds no value; the first entry whose predicate accepts wins.
/// Instantiability is discharged at compile time: the `make` thunk
/// type-checks its constructor against the field's declared type.
pub struct TypeDecision {
    /// Evaluation order; lower runs first.
    pub index: i32,
    /// Name of the constructed type, for diagnostics.
    pub type_name: &'static str,
    /// Predicate over the live context and the containing instance.
    /// `None` accepts unconditionally (a final fallback entry).
    pub decide: Option<fn(&LoadContext<'_>, &dyn Any) -> bool>,
    /// Constructs the value, boxed for shape-level installation.
    pub make: fn() -> Box<dyn Any>,
}

impl std::fmt::Debug for TypeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDecision")
            .field("index", &self.index)
            .field("type_name", &self.type_name)
            .field("conditional", &self.decide.is_some())
            .finish()
    }
}
