//! Matching engine: decides whether a free-text "Artist - Title" line
//! corresponds to one of the catalog's search results.

pub mod classifier;
pub mod distance;
pub mod normalize;

pub use classifier::{MatchOutcome, classify};
