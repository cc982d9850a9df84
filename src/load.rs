//! The load engine: reconstructs an object graph from wire entries.
//!
//! Each `(key, value)` occurrence is processed independently through three
//! states: an exact wire-name match, a probe of the complex (unnamed)
//! fields, and a probe of the pattern-matched collection fields. The
//! terminal states are matched or unmatched; an unmatched entry is not an
//! error — callers loading a whole collection simply skip keys they do
//! not recognize.
//!
//! Probing mutates tentatively: a field may be instantiated, a list may be
//! expanded, only for the nested load to miss. Every frame therefore
//! unwinds its own tentative mutations in LIFO order before reporting
//! unmatched — and on the error path as well, so a failed load leaves the
//! target as the attempt found it.

use std::any::Any;

use tracing::trace;

use crate::cache::{self, CacheEntry, CachedField};
use crate::codec::CodecError;
use crate::context::{DeferredCheck, LoadContext, PathStep};
use crate::error::{MismatchKind, Result, WiremapError};
use crate::list::ListError;
use crate::schema::{ElementShape, FieldShape, ListOps, ScalarOps, TypeDecision, WireObject};
use crate::template;
use crate::wire::WireCollection;

fn decode_err(field: &'static str, key: &str, e: CodecError) -> WiremapError {
    WiremapError::UnsupportedDecode { field, key: key.to_string(), detail: e.to_string() }
}

fn list_err(field: &'static str, key: &str, e: ListError) -> WiremapError {
    match e {
        ListError::Codec(c) => decode_err(field, key, c),
        ListError::Guard(reason) => WiremapError::GuardRejected { reason },
        ListError::NoConstructor => WiremapError::TypeNotInstantiable { field },
        ListError::Mismatch => {
            WiremapError::Internal(format!("element type mismatch in field `{field}`"))
        }
        ListError::OutOfRange => {
            WiremapError::Internal(format!("element index out of range in field `{field}`"))
        }
    }
}

/// Loads every entry of `wire` into `target`, then runs the deferred
/// validations in registration order.
pub(crate) fn load_collection(wire: &WireCollection, target: &mut dyn WireObject) -> Result<()> {
    let mut cx = LoadContext::new(wire);
    for (key, value) in wire.iter() {
        if !load_entry(&mut cx, target, key, value)? {
            trace!(key, "unmatched wire entry skipped");
        }
    }
    let checks = cx.validations;
    for check in &checks {
        validate_one(target, check)?;
    }
    Ok(())
}

/// Applies one `(key, value)` occurrence to `target`. Returns whether the
/// entry found a home.
pub(crate) fn load_entry(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    key: &str,
    value: &str,
) -> Result<bool> {
    let entry = cache::entry_for(target)?;

    // Exact wire-name match. Wire names are raw templates; nested loads
    // rewrite matched index spans back into token form, so equality on the
    // raw text is the correct comparison.
    if let Some(&index) = entry.by_name.get(key) {
        let field = &entry.fields[index];
        return match &field.def.shape {
            FieldShape::Scalar(ops) => {
                load_scalar(cx, target, field, ops, index, key, value)?;
                Ok(true)
            }
            FieldShape::Dictionary => {
                Err(WiremapError::DictionaryUnsupported { field: field.def.field_name })
            }
            FieldShape::Object(_) | FieldShape::List(_) => Err(WiremapError::UnsupportedDecode {
                field: field.def.field_name,
                key: key.to_string(),
                detail: "a named field must hold a scalar value".into(),
            }),
        };
    }

    // Complex-field fallback: recursively probe unnamed nested objects.
    for &index in &entry.complex {
        if probe_object(cx, target, &entry, index, key, value)? {
            return Ok(true);
        }
    }

    // Pattern fallback: collection fields and pattern-gated objects.
    for &index in &entry.patterns {
        if probe_pattern(cx, target, &entry, index, key, value)? {
            return Ok(true);
        }
    }

    Ok(false)
}

fn load_scalar(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    field: &CachedField,
    ops: &ScalarOps,
    index: usize,
    key: &str,
    value: &str,
) -> Result<()> {
    let def = field.def;

    if value.is_empty() && def.empty_ignore {
        // Empty is absence: the field takes its declared default.
        return match ops.assign_default {
            Some(assign_default) => {
                assign_default(target.as_any_mut());
                Ok(())
            }
            None if (ops.is_default)(target.as_any()) => Ok(()),
            None => Err(WiremapError::ValidationMismatch {
                field: def.field_name,
                key: key.to_string(),
                kind: MismatchKind::NoSetter,
            }),
        };
    }

    if let Some(assign) = ops.assign {
        assign(target.as_any_mut(), value).map_err(|e| decode_err(def.field_name, key, e))?;
    }

    // Readable fields verify at the end of the load: a later entry (or a
    // custom setter) may still settle the value.
    let agrees =
        (ops.agrees)(target.as_any(), value).map_err(|e| decode_err(def.field_name, key, e))?;
    if !agrees {
        cx.defer(index, key, value);
    }
    Ok(())
}

/// First decision whose predicate accepts, in evaluation-index order.
fn pick(
    cx: &LoadContext<'_>,
    instance: &dyn Any,
    decisions: &[&'static TypeDecision],
) -> Option<&'static TypeDecision> {
    decisions.iter().copied().find(|d| match d.decide {
        Some(predicate) => predicate(cx, instance),
        None => true,
    })
}

/// Constructs a value for an empty field: the winning decision's
/// constructor, else the static type's default constructor.
fn construct(
    cx: &LoadContext<'_>,
    target: &dyn WireObject,
    decisions: &[&'static TypeDecision],
    fallback: Option<fn() -> Box<dyn Any>>,
) -> Option<Box<dyn Any>> {
    match pick(cx, target.as_any(), decisions) {
        Some(decision) => {
            trace!(target_type = decision.type_name, "type decision");
            Some((decision.make)())
        }
        None => fallback.map(|make| make()),
    }
}

fn install_value(
    install: Option<fn(&mut dyn Any, Box<dyn Any>) -> bool>,
    target: &mut dyn WireObject,
    value: Box<dyn Any>,
    field: &'static str,
) -> Result<()> {
    let Some(install) = install else {
        return Err(WiremapError::Internal(format!(
            "field `{field}` cannot accept an instantiated value"
        )));
    };
    if install(target.as_any_mut(), value) {
        Ok(())
    } else {
        Err(WiremapError::Internal(format!(
            "decision constructed a foreign type for field `{field}`"
        )))
    }
}

/// Tries to route the entry into an unnamed (or pattern-gated) nested
/// object, instantiating it when empty and unwinding on a miss.
fn probe_object(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    entry: &CacheEntry,
    index: usize,
    key: &str,
    value: &str,
) -> Result<bool> {
    let field = &entry.fields[index];
    let def = field.def;
    let FieldShape::Object(ops) = &def.shape else {
        return Ok(false);
    };

    let installed = if (ops.present)(target.as_any()) {
        false
    } else {
        let made = construct(cx, target, &field.decisions, ops.make_default)
            .ok_or(WiremapError::TypeNotInstantiable { field: def.field_name })?;
        install_value(ops.install, target, made, def.field_name)?;
        true
    };

    let outcome = match (ops.get_mut)(target.as_any_mut()) {
        Some(nested) => {
            cx.path.push(PathStep::Field(index));
            let result = load_entry(cx, nested, key, value);
            cx.path.pop();
            result
        }
        None => Err(WiremapError::Internal(format!(
            "field `{}` vanished after installation",
            def.field_name
        ))),
    };

    match outcome {
        Ok(true) => Ok(true),
        other => {
            // Miss or failure: the tentative instantiation is unwound
            // before the next candidate is tried.
            if installed {
                if let Some(clear) = ops.clear {
                    clear(target.as_any_mut());
                }
            }
            other
        }
    }
}

fn probe_pattern(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    entry: &CacheEntry,
    index: usize,
    key: &str,
    value: &str,
) -> Result<bool> {
    let field = &entry.fields[index];
    let def = field.def;
    let Some(pattern) = def.name_pattern else {
        return Ok(false);
    };

    // Token-free patterns were compiled at cache build; token-bearing ones
    // pick up the live bindings here.
    let compiled;
    let regex = match &field.regex {
        Some(regex) => regex,
        None => {
            let source = template::prepare_pattern(pattern, &cx.bindings);
            compiled = template::compile_pattern(&source).map_err(|e| {
                WiremapError::AmbiguousConfiguration {
                    type_name: entry.type_name,
                    detail: format!("invalid pattern on field `{}`: {e}", def.field_name),
                }
            })?;
            &compiled
        }
    };

    let Some(caps) = regex.captures(key) else {
        return Ok(false);
    };

    match &def.shape {
        FieldShape::Object(_) => probe_object(cx, target, entry, index, key, value),
        FieldShape::List(ops) => {
            load_pattern_list(cx, target, entry, index, ops, &caps, key, value)
        }
        FieldShape::Dictionary => {
            Err(WiremapError::DictionaryUnsupported { field: def.field_name })
        }
        FieldShape::Scalar(_) => Err(WiremapError::Internal(format!(
            "pattern on scalar field `{}`",
            def.field_name
        ))),
    }
}

#[allow(clippy::too_many_arguments)]
fn load_pattern_list(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    entry: &CacheEntry,
    index: usize,
    ops: &ListOps,
    caps: &regex::Captures<'_>,
    key: &str,
    value: &str,
) -> Result<bool> {
    let field = &entry.fields[index];
    let def = field.def;
    let key_name = def.key_name.ok_or_else(|| {
        WiremapError::Internal(format!("list `{}` lost its key name", def.field_name))
    })?;

    // An alternation where the index group did not participate is treated
    // as no match.
    let Some(group) = caps.name(key_name) else {
        return Ok(false);
    };
    let element_index: usize = group.as_str().parse().map_err(|e| WiremapError::UnsupportedDecode {
        field: def.field_name,
        key: key.to_string(),
        detail: format!("element index: {e}"),
    })?;

    let installed = if (ops.present)(target.as_any()) {
        false
    } else {
        let made = construct(cx, target, &field.decisions, ops.make_default)
            .ok_or(WiremapError::TypeNotInstantiable { field: def.field_name })?;
        install_value(ops.install, target, made, def.field_name)?;
        true
    };
    let pre_len = (ops.len)(target.as_any());

    let outcome = load_list_element(
        cx,
        target,
        field,
        ops,
        index,
        element_index,
        (group.start(), group.end()),
        key_name,
        key,
        value,
    );

    match outcome {
        Ok(true) => Ok(true),
        other => {
            // Expansion and instantiation are unwound in reverse order of
            // their application.
            (ops.truncate)(target.as_any_mut(), pre_len);
            if installed {
                if let Some(clear) = ops.clear {
                    clear(target.as_any_mut());
                }
            }
            other
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn load_list_element(
    cx: &mut LoadContext<'_>,
    target: &mut dyn WireObject,
    field: &CachedField,
    ops: &ListOps,
    field_index: usize,
    element_index: usize,
    span: (usize, usize),
    key_name: &str,
    key: &str,
    value: &str,
) -> Result<bool> {
    let def = field.def;

    if element_index >= (ops.len)(target.as_any()) {
        if !ops.can_expand {
            return Err(WiremapError::ListBounds {
                field: def.field_name,
                index: element_index,
                len: (ops.len)(target.as_any()),
            });
        }
        // The winning element decision is picked once; its constructor
        // runs once per new slot. Gaps are filled with default-constructed
        // placeholders.
        let decision = pick(cx, target.as_any(), &field.element_decisions);
        while (ops.len)(target.as_any()) <= element_index {
            let seed = decision.map(|d| (d.make)());
            (ops.expand)(target.as_any_mut(), seed)
                .map_err(|e| list_err(def.field_name, key, e))?;
        }
    }

    match &ops.element {
        ElementShape::Scalar(el) => {
            (el.assign)(target.as_any_mut(), element_index, value)
                .map_err(|e| list_err(def.field_name, key, e))?;
            Ok(true)
        }
        ElementShape::Object(el) => {
            // Rewrite the matched index span back into token form so the
            // element's own templated names and patterns match textually.
            let transformed = format!("{}{{{key_name}}}{}", &key[..span.0], &key[span.1..]);
            match (el.get_mut)(target.as_any_mut(), element_index) {
                Some(nested) => {
                    cx.path.push(PathStep::Element(field_index, element_index));
                    let result = load_entry(cx, nested, &transformed, value);
                    cx.path.pop();
                    result
                }
                None => Err(WiremapError::Internal(format!(
                    "element {element_index} of `{}` vanished after expansion",
                    def.field_name
                ))),
            }
        }
    }
}

/// Replays one deferred check against the finished object graph.
fn validate_one(root: &dyn WireObject, check: &DeferredCheck) -> Result<()> {
    let mut current: &dyn WireObject = root;
    for step in &check.path {
        let entry = cache::entry_for(current)?;
        let next = match *step {
            PathStep::Field(fi) => match &entry.fields[fi].def.shape {
                FieldShape::Object(ops) => (ops.get)(current.as_any()),
                _ => None,
            },
            PathStep::Element(fi, ei) => match &entry.fields[fi].def.shape {
                FieldShape::List(ops) => match &ops.element {
                    ElementShape::Object(el) => (el.get)(current.as_any(), ei),
                    ElementShape::Scalar(_) => None,
                },
                _ => None,
            },
        };
        current = next.ok_or_else(|| {
            WiremapError::Internal("deferred validation path no longer resolves".into())
        })?;
    }

    let entry = cache::entry_for(current)?;
    let field = &entry.fields[check.field];
    let def = field.def;
    let FieldShape::Scalar(ops) = &def.shape else {
        return Err(WiremapError::Internal(format!(
            "deferred validation on non-scalar field `{}`",
            def.field_name
        )));
    };

    let agrees = (ops.agrees)(current.as_any(), &check.text)
        .map_err(|e| decode_err(def.field_name, &check.key, e))?;
    if agrees {
        Ok(())
    } else {
        let kind = if ops.assign.is_none() {
            MismatchKind::NoSetter
        } else {
            MismatchKind::Ineffective
        };
        Err(WiremapError::ValidationMismatch {
            field: def.field_name,
            key: check.key.clone(),
            kind,
        })
    }
}
