use std::collections::HashSet;

use super::tokenize::tokenize;

/// Tokens that mark logical negation.
pub const NEGATION_MARKERS: &[&str] = &["not", "never", "no", "none", "cannot", "n't"];

/// Returns `true` if the raw `text` contains any negation marker.
///
/// Set membership over the lowercased tokens of the original text; word order
/// and scope are ignored, so double negation ("not uncommon") still counts
/// as negated.
pub fn has_negation(text: &str) -> bool {
    let tokens: HashSet<String> = tokenize(text).into_iter().collect();
    NEGATION_MARKERS
        .iter()
        .any(|marker| tokens.contains(*marker))
}
