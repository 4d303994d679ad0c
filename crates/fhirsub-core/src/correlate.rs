//! Genotype correlation.
//!
//! A submitted observation is matched back to the observation that produced
//! it by a key derived from its typing string. Request-building and
//! response-matching code must derive the key identically, so this is the
//! only copy of the parsing rule in the codebase.

use crate::model::FIELD_SEPARATOR;

/// Correlation key of a genotype-bearing typing string: the first field,
/// as split by the schema's field separator. A string with no separator is
/// its own key.
pub fn correlation_key(glstring: &str) -> &str {
    match glstring.find(FIELD_SEPARATOR) {
        Some(idx) => &glstring[..idx],
        None => glstring,
    }
}
