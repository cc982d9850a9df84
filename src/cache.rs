//! The process-wide type metadata cache.
//!
//! A type's [`Schema`] is declarative; before the engines can run it they
//! need it validated, sorted, and indexed. That work happens exactly once
//! per type, behind a process-wide lock with a double-checked fast path.
//! Once built, a [`CacheEntry`] is immutable and read lock-free through
//! its `Arc`; [`clear`] can drop entries while conversions holding an
//! `Arc` keep running on the entry they already fetched.

use std::any::TypeId;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;
use tracing::debug;

use crate::context::Bindings;
use crate::error::{Result, WiremapError};
use crate::schema::{FieldDef, FieldShape, Schema, TypeDecision, WireObject};
use crate::template;

/// One field of a built cache entry.
pub(crate) struct CachedField {
    pub def: &'static FieldDef,
    /// Precompiled pattern; only for patterns free of placeholder tokens.
    /// Token-bearing patterns are compiled per use against live bindings.
    pub regex: Option<Regex>,
    /// Field decisions, sorted by evaluation index.
    pub decisions: Vec<&'static TypeDecision>,
    /// Element decisions, sorted by evaluation index.
    pub element_decisions: Vec<&'static TypeDecision>,
}

/// Built, immutable metadata of one type.
pub(crate) struct CacheEntry {
    pub type_name: &'static str,
    /// Fields sorted stably by save order.
    pub fields: Vec<CachedField>,
    /// Exact wire name → field index.
    pub by_name: HashMap<&'static str, usize>,
    /// Indices of pattern-matched fields, in cached order.
    pub patterns: Vec<usize>,
    /// Indices of complex fields (no name, no pattern), in cached order.
    pub complex: Vec<usize>,
}

fn store() -> &'static RwLock<HashMap<TypeId, Arc<CacheEntry>>> {
    static STORE: OnceLock<RwLock<HashMap<TypeId, Arc<CacheEntry>>>> = OnceLock::new();
    STORE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Fetches (building if necessary) the cache entry for `obj`'s concrete
/// type.
pub(crate) fn entry_for(obj: &dyn WireObject) -> Result<Arc<CacheEntry>> {
    let type_id = obj.as_any().type_id();

    if let Ok(map) = store().read() {
        if let Some(entry) = map.get(&type_id) {
            return Ok(Arc::clone(entry));
        }
    }

    let mut map = store()
        .write()
        .map_err(|_| WiremapError::Internal("metadata cache lock poisoned".into()))?;
    // Double-check: another thread may have built it while we waited.
    if let Some(entry) = map.get(&type_id) {
        return Ok(Arc::clone(entry));
    }
    let entry = Arc::new(build(obj.schema())?);
    debug!(type_name = entry.type_name, fields = entry.fields.len(), "built wire metadata");
    map.insert(type_id, Arc::clone(&entry));
    Ok(entry)
}

/// Drops every cached entry. Conversions already holding an entry are
/// unaffected; the next conversion per type rebuilds.
pub(crate) fn clear() {
    if let Ok(mut map) = store().write() {
        let dropped = map.len();
        map.clear();
        debug!(dropped, "cleared wire metadata cache");
    }
}

fn ambiguous(type_name: &'static str, detail: impl Into<String>) -> WiremapError {
    WiremapError::AmbiguousConfiguration { type_name, detail: detail.into() }
}

fn sorted_decisions(decisions: &'static [TypeDecision]) -> Vec<&'static TypeDecision> {
    let mut out: Vec<&'static TypeDecision> = decisions.iter().collect();
    out.sort_by_key(|d| d.index);
    out
}

/// Validates `def`'s pattern and precompiles it when it carries no
/// placeholder tokens.
fn check_pattern(type_name: &'static str, def: &'static FieldDef) -> Result<Option<Regex>> {
    let Some(pattern) = def.name_pattern else {
        return Ok(None);
    };

    // Token-bearing patterns are validated against the token-escaped form;
    // group structure is unaffected by the substitution.
    let probe_source = template::prepare_pattern(pattern, &Bindings::default());
    let probe = template::compile_pattern(&probe_source).map_err(|e| {
        ambiguous(type_name, format!("invalid pattern on field `{}`: {e}", def.field_name))
    })?;

    if let Some(key_name) = def.key_name {
        let has_group = probe.capture_names().flatten().any(|name| name == key_name);
        if !has_group {
            return Err(ambiguous(
                type_name,
                format!(
                    "pattern on field `{}` lacks the `{key_name}` capture group",
                    def.field_name
                ),
            ));
        }
    }

    Ok(if template::has_tokens(pattern) { None } else { Some(probe) })
}

fn build(schema: &'static Schema) -> Result<CacheEntry> {
    let type_name = schema.type_name;

    let mut defs: Vec<&'static FieldDef> = schema.fields.iter().collect();
    // Stable: equal save orders keep declaration order.
    defs.sort_by(|a, b| a.save_order.partial_cmp(&b.save_order).unwrap_or(Ordering::Equal));

    let mut fields = Vec::with_capacity(defs.len());
    let mut by_name = HashMap::new();
    let mut patterns = Vec::new();
    let mut complex = Vec::new();

    for (index, def) in defs.into_iter().enumerate() {
        if matches!(def.shape, FieldShape::List(_)) && def.key_name.is_none() {
            return Err(ambiguous(
                type_name,
                format!("collection field `{}` declares no key/index name", def.field_name),
            ));
        }
        if matches!(def.shape, FieldShape::Scalar(_)) && def.name_pattern.is_some() {
            return Err(ambiguous(
                type_name,
                format!("scalar field `{}` cannot carry a match pattern", def.field_name),
            ));
        }

        let regex = check_pattern(type_name, def)?;

        if let Some(name) = def.wire_name {
            if by_name.insert(name, index).is_some() {
                return Err(ambiguous(type_name, format!("duplicate wire name `{name}`")));
            }
        }
        if def.name_pattern.is_some() {
            patterns.push(index);
        }
        if matches!(def.shape, FieldShape::Object(_))
            && def.wire_name.is_none()
            && def.name_pattern.is_none()
        {
            complex.push(index);
        }

        fields.push(CachedField {
            def,
            regex,
            decisions: sorted_decisions(def.decisions),
            element_decisions: sorted_decisions(def.element_decisions),
        });
    }

    Ok(CacheEntry { type_name, fields, by_name, patterns, complex })
}
