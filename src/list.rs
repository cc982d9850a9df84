//! The list adapter and the guarded collection type.
//!
//! [`WireList`] is the narrow interface the engines use to measure,
//! expand, and address indexable collections: `Vec<T>` grows on demand,
//! `[T; N]` is fixed, and [`GuardedList<T>`] runs an injected validator
//! before every mutation. Cross-cutting invariants ("at most one group may
//! contain a flagged item") live in that validator, and the engine's own
//! insertion path goes through it — loading cannot bypass a constraint
//! that direct mutation would enforce.

use std::sync::Arc;

use crate::codec::CodecError;
use crate::error::{Result, WiremapError};

/// Failure of a list-level operation, before field context is attached.
#[derive(Debug)]
pub enum ListError {
    /// An element value failed to encode or decode.
    Codec(CodecError),
    /// The collection's validator vetoed the mutation.
    Guard(String),
    /// No constructor is available for a new element slot.
    NoConstructor,
    /// A constructed element was not of the collection's element type.
    Mismatch,
    /// The index is beyond a collection that cannot grow.
    OutOfRange,
}

/// Indexable collection access used by generated accessor bindings.
///
/// Implementations exist for `Vec<E>`, `[E; N]` and [`GuardedList<E>`].
pub trait WireList<E> {
    /// Current element count.
    fn len(&self) -> usize;
    /// Borrows the element at `index`.
    fn get(&self, index: usize) -> Option<&E>;
    /// Mutably borrows the element at `index`.
    fn get_mut(&mut self, index: usize) -> Option<&mut E>;
    /// Whether the collection can grow past its current length.
    fn can_expand(&self) -> bool;
    /// Appends one element, subject to any validator.
    fn try_push(&mut self, element: E) -> std::result::Result<(), ListError>;
    /// Replaces the element at `index`, subject to any validator.
    fn try_set(&mut self, index: usize, element: E) -> std::result::Result<(), ListError>;
    /// Shrinks back to `len` without consulting any validator. Rollback
    /// only: the restored state was already approved once.
    fn undo_truncate(&mut self, len: usize);
}

impl<E> WireList<E> for Vec<E> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.as_mut_slice().get_mut(index)
    }

    fn can_expand(&self) -> bool {
        true
    }

    fn try_push(&mut self, element: E) -> std::result::Result<(), ListError> {
        self.push(element);
        Ok(())
    }

    fn try_set(&mut self, index: usize, element: E) -> std::result::Result<(), ListError> {
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = element;
                Ok(())
            }
            None => Err(ListError::OutOfRange),
        }
    }

    fn undo_truncate(&mut self, len: usize) {
        self.truncate(len);
    }
}

impl<E, const N: usize> WireList<E> for [E; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.as_mut_slice().get_mut(index)
    }

    fn can_expand(&self) -> bool {
        false
    }

    fn try_push(&mut self, _element: E) -> std::result::Result<(), ListError> {
        Err(ListError::OutOfRange)
    }

    fn try_set(&mut self, index: usize, element: E) -> std::result::Result<(), ListError> {
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = element;
                Ok(())
            }
            None => Err(ListError::OutOfRange),
        }
    }

    fn undo_truncate(&mut self, _len: usize) {
        // Fixed-size: expansion never happened, nothing to undo.
    }
}

/// A mutation about to be applied to a [`GuardedList`], as seen by its
/// validator. The validator observes the list in its pre-mutation state.
pub enum ListOp<'a, T> {
    /// `element` will be inserted at `index`.
    Insert {
        /// Insertion position.
        index: usize,
        /// Element to insert.
        element: &'a T,
    },
    /// `element` will replace the value at `index`.
    Set {
        /// Position being replaced.
        index: usize,
        /// Replacement element.
        element: &'a T,
    },
    /// The element at `index` will be removed.
    Remove {
        /// Position being removed.
        index: usize,
    },
    /// All elements will be removed.
    Clear,
}

/// Validator invoked before every [`GuardedList`] mutation. Returning an
/// `Err` vetoes the mutation with the given reason.
pub type ListGuard<T> =
    Arc<dyn Fn(&GuardedList<T>, ListOp<'_, T>) -> std::result::Result<(), String> + Send + Sync>;

/// A growable collection that intercepts insert/set/remove with an
/// injected validator.
///
/// The validator is consulted on every mutating entry point — including
/// the ones the load engine uses — so an invariant expressed here holds
/// no matter who mutates the list.
///
/// ## Examples
///
/// ```rust
/// use wiremap::{GuardedList, ListOp};
///
/// let mut list: GuardedList<i64> = GuardedList::with_guard(std::sync::Arc::new(
///     |_list, op| match op {
///         ListOp::Insert { element, .. } | ListOp::Set { element, .. } if *element < 0 => {
///             Err("negative values are not allowed".into())
///         }
///         _ => Ok(()),
///     },
/// ));
/// assert!(list.try_push(3).is_ok());
/// assert!(list.try_push(-1).is_err());
/// assert_eq!(list.len(), 1);
/// ```
pub struct GuardedList<T> {
    items: Vec<T>,
    guard: Option<ListGuard<T>>,
}

impl<T> GuardedList<T> {
    /// Creates an empty, unguarded list.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new(), guard: None }
    }

    /// Creates an empty list with a validator.
    #[must_use]
    pub fn with_guard(guard: ListGuard<T>) -> Self {
        Self { items: Vec::new(), guard: Some(guard) }
    }

    /// Installs (or replaces) the validator. Existing elements are not
    /// re-validated.
    pub fn set_guard(&mut self, guard: ListGuard<T>) {
        self.guard = Some(guard);
    }

    /// Element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrows the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutably borrows the element at `index`. Interior mutation of an
    /// element is not a list mutation and is not validated.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn check(&self, op: ListOp<'_, T>) -> std::result::Result<(), String> {
        match &self.guard {
            Some(guard) => guard(self, op),
            None => Ok(()),
        }
    }

    /// Inserts `element` at `index`, subject to the validator.
    pub fn try_insert(&mut self, index: usize, element: T) -> Result<()> {
        if index > self.items.len() {
            return Err(WiremapError::Internal(format!(
                "insert index {index} beyond length {}",
                self.items.len()
            )));
        }
        self.check(ListOp::Insert { index, element: &element })
            .map_err(|reason| WiremapError::GuardRejected { reason })?;
        self.items.insert(index, element);
        Ok(())
    }

    /// Appends `element`, subject to the validator.
    pub fn try_push(&mut self, element: T) -> Result<()> {
        self.try_insert(self.items.len(), element)
    }

    /// Replaces the element at `index`, subject to the validator.
    pub fn try_set(&mut self, index: usize, element: T) -> Result<()> {
        if index >= self.items.len() {
            return Err(WiremapError::Internal(format!(
                "set index {index} beyond length {}",
                self.items.len()
            )));
        }
        self.check(ListOp::Set { index, element: &element })
            .map_err(|reason| WiremapError::GuardRejected { reason })?;
        if let Some(slot) = self.items.get_mut(index) {
            *slot = element;
        }
        Ok(())
    }

    /// Removes and returns the element at `index`, subject to the
    /// validator.
    pub fn try_remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(WiremapError::Internal(format!(
                "remove index {index} beyond length {}",
                self.items.len()
            )));
        }
        self.check(ListOp::Remove { index })
            .map_err(|reason| WiremapError::GuardRejected { reason })?;
        Ok(self.items.remove(index))
    }

    /// Removes every element, subject to the validator.
    pub fn try_clear(&mut self) -> Result<()> {
        self.check(ListOp::Clear)
            .map_err(|reason| WiremapError::GuardRejected { reason })?;
        self.items.clear();
        Ok(())
    }
}

impl<T> Default for GuardedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GuardedList<T> {
    fn clone(&self) -> Self {
        Self { items: self.items.clone(), guard: self.guard.clone() }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for GuardedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedList")
            .field("items", &self.items)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for GuardedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> From<Vec<T>> for GuardedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, guard: None }
    }
}

impl<T> FromIterator<T> for GuardedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect(), guard: None }
    }
}

impl<'a, T> IntoIterator for &'a GuardedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E> WireList<E> for GuardedList<E> {
    fn len(&self) -> usize {
        GuardedList::len(self)
    }

    fn get(&self, index: usize) -> Option<&E> {
        GuardedList::get(self, index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        GuardedList::get_mut(self, index)
    }

    fn can_expand(&self) -> bool {
        true
    }

    fn try_push(&mut self, element: E) -> std::result::Result<(), ListError> {
        self.check(ListOp::Insert { index: self.items.len(), element: &element })
            .map_err(ListError::Guard)?;
        self.items.push(element);
        Ok(())
    }

    fn try_set(&mut self, index: usize, element: E) -> std::result::Result<(), ListError> {
        if index >= self.items.len() {
            return Err(ListError::OutOfRange);
        }
        self.check(ListOp::Set { index, element: &element })
            .map_err(ListError::Guard)?;
        if let Some(slot) = self.items.get_mut(index) {
            *slot = element;
        }
        Ok(())
    }

    fn undo_truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }
}
