//! Co-founder compatibility scoring and candidate ranking.

mod breakdown;
pub mod router;
mod scorer;
mod service;

pub use breakdown::{ScoreBreakdown, ScoreCategory, ScoreComponent};
pub use router::match_router;
pub use scorer::compute_score;
pub use service::{rank_candidates, MatchCandidate, MatchService, MatchServiceError};
