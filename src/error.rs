//! Centralized error handling for Wiremap.
//!
//! All failure conditions are represented as `Result` values; the crate
//! enforces this through `#![deny(clippy::panic)]` and
//! `#![deny(clippy::unwrap_used)]`. Errors carry enough context (field
//! name, wire key) to diagnose a failed conversion without a debugger.
//!
//! ## Error categories
//!
//! - **Configuration** ([`WiremapError::AmbiguousConfiguration`]): a
//!   descriptor table that cannot be honored — duplicate wire names, a
//!   collection pattern missing its capture group, an invalid regex.
//!   Raised when the type's metadata entry is built, not at use.
//! - **Encoding** ([`WiremapError::UnsupportedValueType`]): a value that
//!   cannot be rendered as a wire string.
//! - **Decoding** ([`WiremapError::UnsupportedDecode`]): a wire value that
//!   cannot be parsed as the target field's type.
//! - **Instantiation** ([`WiremapError::TypeNotInstantiable`]): no type
//!   decision matched and the field's static type has no usable
//!   constructor.
//! - **Shape** ([`WiremapError::DictionaryUnsupported`],
//!   [`WiremapError::ListBounds`]): map-shaped fields are rejected
//!   outright; fixed-size arrays are never resized.
//! - **Post-load validation** ([`WiremapError::ValidationMismatch`]): a
//!   deferred check found that a field does not hold the value the wire
//!   collection carried.
//! - **Guarded collections** ([`WiremapError::GuardRejected`]): an
//!   injected list validator vetoed an insert or assignment.
//! - **Internal** ([`WiremapError::Internal`]): logic errors that should
//!   not occur in production; please report them.

use thiserror::Error;

/// A specialized `Result` type for Wiremap operations.
///
/// Used throughout the library to simplify error handling.
pub type Result<T> = std::result::Result<T, WiremapError>;

/// Which deferred validation failed, and why.
///
/// Distinguishes a field that could never be written from one whose setter
/// ran but did not take effect (for example a custom setter that rejected
/// or normalized the value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// The field has no setter and its readable value differs from the
    /// wire value.
    NoSetter,
    /// The field was assigned, but reading it back does not produce the
    /// assigned value.
    Ineffective,
}

impl std::fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSetter => write!(f, "field has no setter and the value differs"),
            Self::Ineffective => write!(f, "the value did not change after assignment"),
        }
    }
}

/// The master error enum covering all failure domains in Wiremap.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum WiremapError {
    /// A value could not be encoded as a wire string.
    ///
    /// With derived descriptor tables this only occurs for hand-authored
    /// tables that route a non-scalar value through scalar operations.
    #[error("unsupported value type in field `{field}`: {detail}")]
    UnsupportedValueType {
        /// Field whose value failed to encode.
        field: &'static str,
        /// Codec-level explanation.
        detail: String,
    },

    /// A wire value is present but cannot be parsed as the target type.
    #[error("cannot decode `{key}` into field `{field}`: {detail}")]
    UnsupportedDecode {
        /// Target field.
        field: &'static str,
        /// Wire key whose value failed to decode.
        key: String,
        /// Codec-level explanation.
        detail: String,
    },

    /// No type decision matched and the field's static type has no
    /// zero-argument constructor.
    #[error("no instantiable type for field `{field}`")]
    TypeNotInstantiable {
        /// Field that needed a fresh value.
        field: &'static str,
    },

    /// Dictionary-shaped fields are not supported; they fail loudly
    /// rather than dropping data.
    #[error("dictionaries are not supported (field `{field}`)")]
    DictionaryUnsupported {
        /// The offending field.
        field: &'static str,
    },

    /// A pattern load addressed an index outside a non-expandable
    /// collection.
    #[error("index {index} is out of bounds for fixed-size field `{field}` (len {len})")]
    ListBounds {
        /// The collection field.
        field: &'static str,
        /// Requested element index.
        index: usize,
        /// Actual collection length.
        len: usize,
    },

    /// A deferred post-load check found the field's readable value differs
    /// from what the wire collection carried.
    #[error("validation failed for field `{field}` (wire key `{key}`): {kind}")]
    ValidationMismatch {
        /// Field that failed the check.
        field: &'static str,
        /// Wire key that produced the expected value.
        key: String,
        /// Sub-kind of the mismatch.
        kind: MismatchKind,
    },

    /// The descriptor table itself is contradictory or incomplete.
    #[error("ambiguous configuration on `{type_name}`: {detail}")]
    AmbiguousConfiguration {
        /// Type whose descriptors are misconfigured.
        type_name: &'static str,
        /// What is wrong with them.
        detail: String,
    },

    /// A guarded collection's validator vetoed a mutation performed by the
    /// engine.
    #[error("guarded collection rejected the operation: {reason}")]
    GuardRejected {
        /// Reason returned by the injected validator.
        reason: String,
    },

    /// Logic error in the engine. Should not occur in production; please
    /// report it with a reproduction case.
    #[error("internal error: {0}")]
    Internal(String),
}
