use crate::matching::distance::distance;
use crate::matching::normalize::normalize;
use crate::ports::catalog::Candidate;

/// Distance at which a candidate is an exact match.
pub const EXACT_DISTANCE: usize = 0;

/// Largest distance still accepted as a (partial) match.
pub const PARTIAL_DISTANCE_MAX: usize = 3;

/// Result of matching one query against its candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Query and candidate are identical after normalization
    Exact { uri: String },
    /// Close enough to use, but worth a human look
    Partial {
        uri: String,
        query: String,
        candidate_text: String,
        distance: usize,
    },
    /// No candidate within the partial threshold
    Unmatched { query: String },
}

impl MatchOutcome {
    /// Catalog identifier to put in the playlist, if the outcome is usable.
    pub fn uri(&self) -> Option<&str> {
        match self {
            MatchOutcome::Exact { uri } | MatchOutcome::Partial { uri, .. } => Some(uri),
            MatchOutcome::Unmatched { .. } => None,
        }
    }
}

/// Text a candidate is scored by: `"<primary artist> - <title>"`.
pub fn comparable_text(candidate: &Candidate) -> String {
    format!("{} - {}", candidate.primary_artist, normalize(&candidate.title))
}

/// Classify `query` against `candidates`, which must be in service rank order.
///
/// First fit: the scan stops at the first candidate within
/// [`PARTIAL_DISTANCE_MAX`], even if a later one would score better.
pub fn classify(query: &str, candidates: &[Candidate]) -> MatchOutcome {
    let query = normalize(query);

    for candidate in candidates {
        let candidate_text = comparable_text(candidate);
        let d = distance(&query, &candidate_text);

        if d == EXACT_DISTANCE {
            return MatchOutcome::Exact {
                uri: candidate.uri.clone(),
            };
        }
        if d <= PARTIAL_DISTANCE_MAX {
            return MatchOutcome::Partial {
                uri: candidate.uri.clone(),
                query,
                candidate_text,
                distance: d,
            };
        }
    }

    MatchOutcome::Unmatched { query }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(artist: &str, title: &str, uri: &str) -> Candidate {
        Candidate {
            primary_artist: artist.to_string(),
            title: title.to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_empty_candidates_is_unmatched() {
        assert_eq!(
            classify("The Beatles - Let It Be", &[]),
            MatchOutcome::Unmatched {
                query: "The Beatles - Let It Be".to_string()
            }
        );
    }

    #[test]
    fn test_exact_match() {
        let candidates = [candidate("The Beatles", "Let It Be", "uri:1")];
        assert_eq!(
            classify("The Beatles - Let It Be", &candidates),
            MatchOutcome::Exact {
                uri: "uri:1".to_string()
            }
        );
    }

    #[test]
    fn test_one_letter_typo_is_partial() {
        let candidates = [candidate("The Beatles", "Let It Be", "uri:1")];
        assert_eq!(
            classify("The Beatles - Lett It Be", &candidates),
            MatchOutcome::Partial {
                uri: "uri:1".to_string(),
                query: "The Beatles - Lett It Be".to_string(),
                candidate_text: "The Beatles - Let It Be".to_string(),
                distance: 1,
            }
        );
    }

    #[test]
    fn test_unrelated_candidates_are_unmatched() {
        let candidates = [
            candidate("Queen", "Bohemian Rhapsody", "uri:1"),
            candidate("ABBA", "Dancing Queen", "uri:2"),
        ];
        let outcome = classify("Completely Unknown Song XYZ", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Unmatched {
                query: "Completely Unknown Song XYZ".to_string()
            }
        );
        assert_eq!(outcome.uri(), None);
    }

    #[test]
    fn test_curly_quote_in_query_matches_exactly() {
        let candidates = [candidate("Queen", "Don't Stop Me Now", "uri:1")];
        assert_eq!(
            classify("Queen - Don\u{2019}t Stop Me Now", &candidates),
            MatchOutcome::Exact {
                uri: "uri:1".to_string()
            }
        );
    }

    #[test]
    fn test_curly_quote_in_candidate_title_matches_exactly() {
        let candidates = [candidate("Queen", "Don\u{2019}t Stop Me Now", "uri:1")];
        assert_eq!(
            classify("Queen - Don't Stop Me Now", &candidates).uri(),
            Some("uri:1")
        );
    }

    #[test]
    fn test_query_line_ending_is_ignored() {
        let candidates = [candidate("The Beatles", "Let It Be", "uri:1")];
        assert_eq!(
            classify("The Beatles - Let It Be\r\n", &candidates),
            MatchOutcome::Exact {
                uri: "uri:1".to_string()
            }
        );
    }

    #[test]
    fn test_first_exact_candidate_wins() {
        let candidates = [
            candidate("Someone Else", "Let It Be", "uri:0"),
            candidate("The Beatles", "Let It Be", "uri:1"),
            candidate("The Beatles", "Let It Be", "uri:2"),
        ];
        assert_eq!(
            classify("The Beatles - Let It Be", &candidates).uri(),
            Some("uri:1")
        );
    }

    #[test]
    fn test_first_fit_ignores_better_later_candidate() {
        let candidates = [
            candidate("The Beatles", "Let It Bee!", "uri:partial"),
            candidate("The Beatles", "Let It Be", "uri:exact"),
        ];
        let outcome = classify("The Beatles - Let It Be", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Partial {
                uri: "uri:partial".to_string(),
                query: "The Beatles - Let It Be".to_string(),
                candidate_text: "The Beatles - Let It Bee!".to_string(),
                distance: 2,
            }
        );
    }

    #[test]
    fn test_partial_threshold_boundary() {
        // Exactly three edits away is still accepted
        let three = [candidate("ABBA", "Waterlooooo", "uri:3")];
        assert!(matches!(
            classify("ABBA - Waterloo", &three),
            MatchOutcome::Partial { distance: 3, .. }
        ));

        // Four edits is too far
        let four = [candidate("ABBA", "Waterloooooo", "uri:4")];
        assert!(matches!(
            classify("ABBA - Waterloo", &four),
            MatchOutcome::Unmatched { .. }
        ));
    }

    #[test]
    fn test_comparable_text_uses_primary_artist() {
        let candidates = [candidate("Daft Punk", "Get Lucky", "uri:1")];
        assert_eq!(
            classify("Daft Punk - Get Lucky", &candidates),
            MatchOutcome::Exact {
                uri: "uri:1".to_string()
            }
        );
        assert_eq!(comparable_text(&candidates[0]), "Daft Punk - Get Lucky");
    }
}
