//! Field extraction and verification for registry charge documents.
//!
//! Everything in here is pure: text in, values out. No I/O, no shared state.

mod dates;
mod evaluate;
mod extract;
mod normalize;
mod similarity;
#[cfg(test)]
mod tests;

pub use dates::{DateInfo, parse_input_date};
pub use evaluate::{ExpectedFields, MatchReport, MatchThresholds, ScoreScaling, evaluate_match};
pub use extract::{ExtractedFields, FieldExtractor, join_pages};
pub use normalize::normalize_text;
pub use similarity::similarity;
