/// Edit distance (insert, delete, substitute; unit costs) over chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Normalized similarity in `[0, 1]`: `(len(longer) - distance) / len(longer)`.
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}
