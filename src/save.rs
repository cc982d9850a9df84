//! The save engine: walks an object's cached field descriptors and emits
//! wire entries.
//!
//! Fields are visited in cached (save-order) sequence. Scalar values
//! encode through the value codec, nested objects recurse, list elements
//! publish their index as a placeholder binding before their wire name is
//! resolved. Writes are additive; a key written by an earlier field is
//! never overwritten by a later one.

use tracing::trace;

use crate::cache::{self, CacheEntry, CachedField};
use crate::codec::CodecError;
use crate::context::SaveContext;
use crate::error::{Result, WiremapError};
use crate::schema::{ElementShape, FieldShape, ListOps, ScalarOps, WireObject};
use crate::template;

fn encode_err(field: &'static str, e: CodecError) -> WiremapError {
    WiremapError::UnsupportedValueType { field, detail: e.to_string() }
}

/// Saves every descriptor-carrying field of `obj` into the context's wire
/// collection, recursively.
pub(crate) fn save_object(cx: &mut SaveContext<'_>, obj: &dyn WireObject) -> Result<()> {
    let entry = cache::entry_for(obj)?;
    for field in &entry.fields {
        match &field.def.shape {
            FieldShape::Dictionary => {
                return Err(WiremapError::DictionaryUnsupported { field: field.def.field_name });
            }
            FieldShape::Scalar(ops) => save_scalar(cx, obj, field, ops)?,
            FieldShape::Object(ops) => {
                if let Some(nested) = (ops.get)(obj.as_any()) {
                    save_object(cx, nested)?;
                }
            }
            FieldShape::List(ops) => save_list(cx, obj, &entry, field, ops)?,
        }
    }
    Ok(())
}

fn save_scalar(
    cx: &mut SaveContext<'_>,
    obj: &dyn WireObject,
    field: &CachedField,
    ops: &ScalarOps,
) -> Result<()> {
    let def = field.def;
    let any = obj.as_any();

    // A field sitting at its default is skipped unless explicitly kept.
    if (ops.is_default)(any) && !def.write_default {
        return Ok(());
    }

    let Some(text) = (ops.encode)(any, def.value_format).map_err(|e| encode_err(def.field_name, e))?
    else {
        // Absent value: nothing to write.
        return Ok(());
    };

    let name = template::resolve_name(def.wire_name.unwrap_or(def.field_name), &cx.bindings);

    // An empty encoding under empty_ignore collapses to the default's
    // encoding, which is itself elided when empty.
    let text = if text.is_empty() && def.empty_ignore {
        match (ops.encode_default)(def.value_format).map_err(|e| encode_err(def.field_name, e))? {
            Some(default_text) if !default_text.is_empty() => default_text,
            _ => return Ok(()),
        }
    } else {
        text
    };

    trace!(key = %name, field = def.field_name, "save entry");
    cx.wire.append(name, text);
    Ok(())
}

fn save_list(
    cx: &mut SaveContext<'_>,
    obj: &dyn WireObject,
    entry: &CacheEntry,
    field: &CachedField,
    ops: &ListOps,
) -> Result<()> {
    let def = field.def;
    let key_name = def
        .key_name
        .ok_or_else(|| WiremapError::Internal(format!("list `{}` lost its key name", def.field_name)))?;

    let count = (ops.len)(obj.as_any());
    for index in 0..count {
        if !cx.bindings.insert(key_name, index.to_string()) {
            return Err(WiremapError::AmbiguousConfiguration {
                type_name: entry.type_name,
                detail: format!(
                    "placeholder `{key_name}` is already bound while saving `{}`",
                    def.field_name
                ),
            });
        }
        let result = save_element(cx, obj, field, ops, index);
        // The binding must not leak into sibling iterations, error or not.
        cx.bindings.remove(key_name);
        result?;
    }
    Ok(())
}

fn save_element(
    cx: &mut SaveContext<'_>,
    obj: &dyn WireObject,
    field: &CachedField,
    ops: &ListOps,
    index: usize,
) -> Result<()> {
    let def = field.def;
    match &ops.element {
        ElementShape::Scalar(el) => {
            let name = template::resolve_name(def.wire_name.unwrap_or(def.field_name), &cx.bindings);
            if let Some(text) = (el.encode)(obj.as_any(), index, def.value_format)
                .map_err(|e| encode_err(def.field_name, e))?
            {
                trace!(key = %name, field = def.field_name, index, "save element");
                cx.wire.append(name, text);
            }
            Ok(())
        }
        ElementShape::Object(el) => match (el.get)(obj.as_any(), index) {
            Some(nested) => save_object(cx, nested),
            None => Ok(()),
        },
    }
}
