//! Key derivation
//!
//! Every field carries a key that ACF uses to store values and that
//! conditional logic rules point at. Keys are derived from the field name and
//! the chain of its ancestors:
//!
//! ```text
//! group "employee" -> field "image" -> sub field "source"
//!
//! field_employee_image
//! field_employee_image_source
//! ```
//!
//! There is no hashing involved. Derivation is a plain sanitization, so the
//! only guarantee is determinism: the same chain and name always produce the
//! same key. Uniqueness is enforced separately by the
//! [`KeyRegistry`](crate::registry::KeyRegistry).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Prefix of every field key
pub const FIELD_PREFIX: &str = "field_";

/// Prefix of every group key
pub const GROUP_PREFIX: &str = "group_";

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

/// Turn a human readable name into a key fragment.
///
/// Lowercases, strips accents (`Über` becomes `uber`), collapses every run
/// of remaining non `[a-z0-9]` characters into a single `_` and trims
/// underscores from both ends. Idempotent.
///
/// Letters without an ASCII base (`ß`, CJK, ...) are folded away like
/// punctuation, so such names may still collide.
pub fn sanitize(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    NON_ALPHANUMERIC
        .replace_all(&folded, "_")
        .trim_matches('_')
        .to_string()
}

/// Pick the explicit parent key when one was tracked, otherwise the fallback.
pub fn resolve_parent_key(explicit: Option<&str>, fallback: &str) -> String {
    match explicit {
        Some(parent) if !parent.is_empty() => parent.to_string(),
        _ => fallback.to_string(),
    }
}

/// Derive the full field key for `name` below `parent_key`.
///
/// `name` is expected to be sanitized already.
pub fn derive_key(parent_key: &str, name: &str) -> String {
    format!("{FIELD_PREFIX}{}", join(parent_key, name))
}

fn join(parent_key: &str, name: &str) -> String {
    if parent_key.is_empty() {
        name.to_string()
    } else {
        format!("{parent_key}_{name}")
    }
}

/// Chain of sanitized ancestor segments, from the group down to (not
/// including) the current field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentKey {
    segments: Vec<String>,
}

impl ParentKey {
    /// The empty chain, used above the group
    pub fn root() -> Self {
        Self::default()
    }

    /// Chain with a single root segment (a group key)
    pub fn group(key: &str) -> Self {
        Self::root().child(key)
    }

    /// Extend the chain with one more segment
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        let segment = sanitize(name);
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }

    /// Whether the chain has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Segments joined with `_`, the prefix used by [`derive_key`]
    pub fn prefix(&self) -> String {
        self.segments.join("_")
    }

    /// Derive the key of a field named `name` directly below this chain
    pub fn key_for(&self, name: &str) -> String {
        derive_key(&self.prefix(), &sanitize(name))
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}
