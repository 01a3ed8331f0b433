/// Canonicalize text before it is compared.
///
/// Unifies the typographic apostrophe (U+2019) with the ASCII one and drops
/// carriage returns and line feeds, so neither quote style nor line endings
/// ever count towards edit distance.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '\r' && c != '\n')
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_curly_apostrophe() {
        assert_eq!(normalize("Don\u{2019}t Stop"), "Don't Stop");
    }

    #[test]
    fn test_normalize_strips_line_endings() {
        assert_eq!(normalize("Queen - Bohemian Rhapsody\r\n"), "Queen - Bohemian Rhapsody");
        assert_eq!(normalize("a\rb\nc"), "abc");
    }

    #[test]
    fn test_normalize_leaves_other_text_alone() {
        // Left single quote and surrounding whitespace are not touched
        assert_eq!(normalize("  \u{2018}Tis  "), "  \u{2018}Tis  ");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in [
            "The Beatles - Let It Be",
            "Don\u{2019}t \u{2019}\u{2019}Stop\r\n",
            "\r\n\r\n",
            "Sigur R\u{f3}s - Hopp\u{ed}polla",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
