//! The value codec: primitive and enum scalars to and from wire strings.
//!
//! Scalars encode with culture-invariant formatting. Booleans render as
//! `"1"`/`"0"`; numerics honor an optional `"0.00"`-family format spec;
//! enums (via `#[derive(WireEnum)]`) render their declared wire code or
//! fall back to the variant name.
//!
//! Decoding is the mirror image, with one asymmetry the load engine relies
//! on: an empty string decodes to [`Decoded::Empty`] ("no value") rather
//! than an error, and an enum code with no table entry decodes to
//! [`Decoded::NotFound`]. Whether "no value" is acceptable is decided by
//! the target field's optionality, not by the codec.

use thiserror::Error;

/// Result alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Failure of a single scalar encode or decode.
///
/// Codec errors are local: the engines wrap them into
/// [`crate::WiremapError`] variants carrying field and key context.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// The value's type has no scalar wire representation.
    #[error("no scalar representation: {0}")]
    Unsupported(String),
    /// The text cannot be parsed as the target type.
    #[error("unparsable value: {0}")]
    Unparsable(String),
    /// The format spec itself is invalid.
    #[error("invalid format spec `{0}`")]
    BadFormat(String),
}

/// Outcome of decoding a wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<T> {
    /// A concrete value was parsed.
    Value(T),
    /// The text was empty — "no value", not an error.
    Empty,
    /// The text was well-formed but matched nothing (an enum code absent
    /// from the type's code table).
    NotFound,
}

/// A value with a scalar wire representation.
///
/// Implemented for the primitive types, `String`, and any enum deriving
/// `WireEnum`. Nested objects deliberately do not implement this trait;
/// the engines treat them as complex and recurse instead.
pub trait WireScalar: Sized {
    /// Renders the value as a wire string, honoring `format` when the type
    /// supports one.
    fn encode(&self, format: Option<&str>) -> CodecResult<String>;

    /// Parses a wire string produced by [`WireScalar::encode`].
    fn decode(text: &str) -> CodecResult<Decoded<Self>>;
}

impl WireScalar for String {
    fn encode(&self, _format: Option<&str>) -> CodecResult<String> {
        // Strings pass through; display formats are a numeric concern.
        Ok(self.clone())
    }

    fn decode(text: &str) -> CodecResult<Decoded<Self>> {
        Ok(Decoded::Value(text.to_string()))
    }
}

impl WireScalar for bool {
    fn encode(&self, _format: Option<&str>) -> CodecResult<String> {
        Ok(if *self { "1" } else { "0" }.to_string())
    }

    fn decode(text: &str) -> CodecResult<Decoded<Self>> {
        match text {
            "" => Ok(Decoded::Empty),
            "1" => Ok(Decoded::Value(true)),
            "0" => Ok(Decoded::Value(false)),
            other => Err(CodecError::Unparsable(format!(
                "expected \"1\" or \"0\", got \"{other}\""
            ))),
        }
    }
}

/// Applies a `"0.00"`-family numeric format: digits after the dot give the
/// fixed precision, zeros before it give a minimum zero-padded width.
fn apply_number_format(spec: &str, value: f64) -> CodecResult<String> {
    let (int_part, frac_part) = match spec.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (spec, None),
    };
    let valid = |s: &str| s.chars().all(|c| c == '0' || c == '#');
    if int_part.is_empty() || !valid(int_part) || !frac_part.map_or(true, valid) {
        return Err(CodecError::BadFormat(spec.to_string()));
    }

    let precision = frac_part.map_or(0, str::len);
    let min_int_digits = int_part.chars().filter(|&c| c == '0').count();

    let mut text = format!("{:.*}", precision, value.abs());
    let int_digits = text.split('.').next().map_or(0, str::len);
    if int_digits < min_int_digits {
        text.insert_str(0, &"0".repeat(min_int_digits - int_digits));
    }
    if value < 0.0 {
        text.insert(0, '-');
    }
    Ok(text)
}

macro_rules! impl_wire_scalar_number {
    ($($t:ty),*) => {
        $(
            impl WireScalar for $t {
                fn encode(&self, format: Option<&str>) -> CodecResult<String> {
                    match format {
                        // Format specs route through f64; wide enough for
                        // the money-and-quantity magnitudes they exist for.
                        Some(spec) => apply_number_format(spec, *self as f64),
                        None => Ok(self.to_string()),
                    }
                }

                fn decode(text: &str) -> CodecResult<Decoded<Self>> {
                    if text.is_empty() {
                        return Ok(Decoded::Empty);
                    }
                    text.parse::<$t>()
                        .map(Decoded::Value)
                        .map_err(|e| CodecError::Unparsable(format!(
                            "\"{text}\" as {}: {e}", stringify!($t)
                        )))
                }
            }
        )*
    }
}

impl_wire_scalar_number!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
