/// Levenshtein distance between `a` and `b`.
///
/// Unit cost for insertions, deletions and substitutions, counted over
/// `char`s rather than bytes so accented titles are not over-penalized.
/// The metric is symmetric.
pub fn distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}
