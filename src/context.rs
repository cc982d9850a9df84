//! Conversion contexts: the live state threaded through a save or load.
//!
//! A context carries the wire collection being produced or consumed, the
//! active `{Placeholder}` bindings, and — on load — the queue of deferred
//! validations and the navigation path used to replay them against the
//! finished object graph.

use std::collections::HashMap;

use crate::template;
use crate::wire::WireCollection;

/// The active placeholder bindings, name → current textual value.
///
/// Placeholder names are unique per nesting level, so the binding stack
/// collapses to a map: a binding is inserted when the engine enters a
/// collection element's scope and removed when it leaves, on every exit
/// path.
#[derive(Debug, Default)]
pub struct Bindings {
    map: HashMap<&'static str, String>,
}

impl Bindings {
    /// The current value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Binds `name`. Returns `false` if `name` is already bound — nested
    /// scopes must use distinct placeholder names.
    pub(crate) fn insert(&mut self, name: &'static str, value: String) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(name, value);
        true
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.map.remove(name);
    }
}

/// Context of an in-progress save.
pub struct SaveContext<'a> {
    pub(crate) wire: &'a mut WireCollection,
    pub(crate) bindings: Bindings,
}

impl<'a> SaveContext<'a> {
    pub(crate) fn new(wire: &'a mut WireCollection) -> Self {
        Self { wire, bindings: Bindings::default() }
    }
}

/// One step of the navigation path from the load target's root to the
/// object a deferred validation must re-inspect.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PathStep {
    /// Descend into the nested object held by the field at this index of
    /// the current type's cached field list.
    Field(usize),
    /// Descend into a collection element: (field index, element index).
    Element(usize, usize),
}

/// A post-load check, replayed once all wire entries are processed.
#[derive(Debug)]
pub(crate) struct DeferredCheck {
    /// Path from the root target to the object containing the field.
    pub path: Vec<PathStep>,
    /// Index of the field in its type's cached field list.
    pub field: usize,
    /// Wire key that produced the expected value (diagnostics).
    pub key: String,
    /// Raw wire text the field was expected to hold.
    pub text: String,
}

/// Context of an in-progress load.
///
/// Type-decision predicates receive this context and may inspect the
/// source collection and the active bindings to pick a concrete type.
pub struct LoadContext<'a> {
    wire: &'a WireCollection,
    pub(crate) bindings: Bindings,
    pub(crate) validations: Vec<DeferredCheck>,
    pub(crate) path: Vec<PathStep>,
}

impl<'a> LoadContext<'a> {
    pub(crate) fn new(wire: &'a WireCollection) -> Self {
        Self {
            wire,
            bindings: Bindings::default(),
            validations: Vec::new(),
            path: Vec::new(),
        }
    }

    /// The wire collection being loaded.
    #[must_use]
    pub fn wire(&self) -> &WireCollection {
        self.wire
    }

    /// The current value bound to a placeholder name, if any.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    /// Whether the source collection contains a key matching `template`
    /// after substituting the active bindings.
    ///
    /// The classic decision-chain predicate: pick a concrete type because
    /// a telltale key (say, `"SIGNATURE"`) is present.
    #[must_use]
    pub fn has_key(&self, template: &str) -> bool {
        let name = template::resolve_name(template, &self.bindings);
        self.wire.contains_key(&name)
    }

    /// Queues a deferred validation for the field at `field` of the object
    /// currently being loaded.
    pub(crate) fn defer(&mut self, field: usize, key: &str, text: &str) {
        self.validations.push(DeferredCheck {
            path: self.path.clone(),
            field,
            key: key.to_string(),
            text: text.to_string(),
        });
    }
}
