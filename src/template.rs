//! `{Placeholder}` substitution for wire names and match patterns.
//!
//! A placeholder is a `{Ident}` token embedded in a templated wire name
//! (`"L_AMT{Index}"`) or a match pattern. Bound tokens are replaced with
//! their current value; unbound tokens stay as literal text. That
//! literalness is load-bearing: when the load engine descends into a
//! collection element it rewrites the matched index span of the wire key
//! back into its `{Token}` form, so nested names and patterns match the
//! rewritten key textually.

use regex::{Regex, RegexBuilder};

use crate::context::Bindings;

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Finds the first `{Ident}` token in `s`, returning the byte range of the
/// whole token and the identifier inside it.
fn next_token(s: &str) -> Option<(usize, usize, &str)> {
    let mut from = 0;
    while let Some(pos) = s[from..].find('{') {
        let start = from + pos;
        let tail = &s[start + 1..];
        if let Some(close) = tail.find('}') {
            let ident = &tail[..close];
            if is_ident(ident) {
                return Some((start, start + close + 2, ident));
            }
        }
        from = start + 1;
    }
    None
}

/// Whether `template` contains any placeholder token.
pub(crate) fn has_tokens(template: &str) -> bool {
    next_token(template).is_some()
}

/// Substitutes bound placeholders into a wire-name template. Unbound
/// tokens are kept verbatim.
pub(crate) fn resolve_name(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((start, end, ident)) = next_token(rest) {
        out.push_str(&rest[..start]);
        match bindings.get(ident) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..end]),
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Substitutes bound placeholders into a regex source. Bound values are
/// escaped into literals; unbound tokens become escaped `\{Ident\}` text
/// so they match the token-form keys produced by nested loads. Regex
/// repetition counts (`\d{2}`) are not identifiers and pass through.
pub(crate) fn prepare_pattern(pattern: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some((start, end, ident)) = next_token(rest) {
        out.push_str(&rest[..start]);
        match bindings.get(ident) {
            Some(value) => out.push_str(&regex::escape(value)),
            None => {
                out.push_str("\\{");
                out.push_str(ident);
                out.push_str("\\}");
            }
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Compiles a prepared pattern source. Patterns are matched in verbose
/// mode, so insignificant whitespace (multi-line patterns) is ignored.
pub(crate) fn compile_pattern(source: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(source).ignore_whitespace(true).build()
}
