//! # Wiremap
//!
//! A declarative, bidirectional mapping engine between arbitrary Rust
//! object graphs and a flat, ordered multimap of string keys to string
//! values — the [`WireCollection`].
//!
//! ## Overview
//!
//! Wire protocols of the name/value family flatten deeply structured
//! requests into entries like `PAYMENTREQUEST_0_AMT=12.50` and
//! `L_PAYMENTREQUEST_0_NAME2=Support plan`. Wiremap lets a plain struct
//! describe that flattening declaratively — one `#[wire(...)]` descriptor
//! per field — and derives both directions from the same metadata:
//!
//! *   **Saving** walks the type's descriptor table in a stable save
//!     order, encodes scalar leaves through a culture-invariant value
//!     codec, resolves `{Placeholder}` name templates against the active
//!     loop bindings, and recurses into nested objects and collections.
//! *   **Loading** replays a collection entry by entry: exact wire-name
//!     hits decode in place, unknown keys probe nested complex fields and
//!     regex-matched collection fields, collections grow on demand, and
//!     every tentative mutation of a failed probe is rolled back in LIFO
//!     order.
//!
//! ## Key features
//!
//! *   **Static metadata, no reflection:** `#[derive(WireObject)]`
//!     generates a `'static` descriptor table per type; accessor bindings
//!     are plain function pointers captured once per field.
//! *   **Cached type metadata:** descriptor tables are validated, sorted,
//!     and indexed once per type in a process-wide cache that is
//!     lock-free to read once built and safe to clear mid-flight.
//! *   **Name templates:** wire names and match patterns may embed
//!     `{Placeholder}` tokens resolved from the enclosing collection
//!     scopes, so nested and repeated structures share one declaration.
//! *   **Ordered type decisions:** polymorphic fields pick their concrete
//!     type through an ordered predicate chain evaluated against the live
//!     collection, the way a response's shape selects a credential or
//!     element type.
//! *   **Transactional probing:** a load attempt that instantiates fields
//!     or expands lists and then fails restores the pre-attempt state
//!     before the next candidate is tried — on error paths too.
//! *   **Guarded collections:** [`GuardedList`] runs an injected
//!     validator on every insert, set, and removal, including the ones
//!     the load engine performs, so cross-cutting invariants cannot be
//!     bypassed by deserialization.
//!
//! ## Usage
//!
//! ```rust
//! use wiremap::{Wiremap, WireObject};
//!
//! #[derive(Default, WireObject)]
//! struct Payment {
//!     #[wire(name = "AMT", format = "0.00")]
//!     amount: f64,
//!     #[wire(name = "DESC")]
//!     description: String,
//!     #[wire(name = "L_NAME{Index}", pattern = r"^L_NAME(?<Index>\d+)$", key = "Index")]
//!     item_names: Vec<String>,
//! }
//!
//! let payment = Payment {
//!     amount: 180.0,
//!     description: "Premium package".into(),
//!     item_names: vec!["Plan".into(), "Support".into()],
//! };
//!
//! let wire = Wiremap::save(&payment)?;
//! assert_eq!(wire.get("AMT"), Some("180.00"));
//! assert_eq!(wire.get("L_NAME1"), Some("Support"));
//!
//! let back: Payment = Wiremap::load(&wire)?;
//! assert_eq!(back.item_names, payment.item_names);
//! # Ok::<(), wiremap::WiremapError>(())
//! ```
//!
//! ## Concurrency
//!
//! Conversions are synchronous and single-threaded per call. Any number
//! of threads may convert distinct objects concurrently, including
//! objects of the same type; the shared metadata cache is double-checked
//! behind a process-wide lock and immutable after construction. Mutating
//! one object from two threads during its own conversion is the caller's
//! bug to avoid.
//!
//! ## Safety and error handling
//!
//! *   **No unsafe code:** enforced by `#![deny(unsafe_code)]`.
//! *   **No panics:** no `unwrap()` or `panic!()` in the library
//!     (enforced by clippy lints); all failures surface as
//!     [`WiremapError`] values carrying field and wire-key context.
//! *   **Loud rejection of the unsupported:** dictionary-shaped fields
//!     fail on save and load instead of silently dropping data.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod api;
pub mod codec;
pub mod context;
pub mod error;
pub mod list;
pub mod schema;
pub mod wire;

// --- INTERNAL IMPLEMENTATION MODULES ---
mod cache;
mod load;
mod save;
mod template;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::Wiremap;
pub use codec::{CodecError, CodecResult, Decoded, WireScalar};
pub use context::LoadContext;
pub use error::{MismatchKind, Result, WiremapError};
pub use list::{GuardedList, ListGuard, ListOp, WireList};
pub use schema::{
    ElementShape, FieldDef, FieldShape, ListOps, ObjectElementOps, ObjectOps, ScalarElementOps,
    ScalarOps, Schema, TypeDecision, WireObject,
};
pub use wire::WireCollection;

// Re-export the derive macros so they are accessible as
// `wiremap::WireObject` / `wiremap::WireEnum`.
pub use wiremap_derive::{WireEnum, WireObject};
