//! Person-name normalization for visibility and history filters.

/// Normalize a person name for comparison.
///
/// Removes all whitespace, including the ideographic space (U+3000), and
/// lowercases. `"田中 太郎"` and `"田中　太郎"` compare equal.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two names after normalization.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
