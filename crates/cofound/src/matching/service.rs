use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::breakdown::ScoreBreakdown;
use super::scorer::compute_score;
use crate::profiles::{Profile, ProfileRepository, RepositoryError, UserId};

/// Candidate profile with the breakdown that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub total: u8,
    pub breakdown: ScoreBreakdown,
}

/// Scores every candidate against `subject`, best first.
///
/// The subject itself is skipped. The sort is stable, so candidates with equal
/// totals keep the order the caller supplied them in.
pub fn rank_candidates<'a, I>(subject: &Profile, candidates: I) -> Vec<MatchCandidate>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let mut ranked: Vec<MatchCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != subject.id)
        .map(|candidate| {
            let breakdown = compute_score(subject, candidate);
            MatchCandidate {
                user_id: candidate.id.clone(),
                display_name: candidate.display_name.clone(),
                total: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    ranked.sort_by(|left, right| right.total.cmp(&left.total));
    ranked
}

/// Ranks stored profiles for a given user.
pub struct MatchService<R> {
    repository: Arc<R>,
}

impl<R> MatchService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Best matches for `user_id`, dropping anyone under `min_score`.
    pub fn rank_for(
        &self,
        user_id: &UserId,
        limit: usize,
        min_score: u8,
    ) -> Result<Vec<MatchCandidate>, MatchServiceError> {
        let subject = self
            .repository
            .fetch_profile(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        let candidates = self.repository.list_profiles()?;

        let mut ranked = rank_candidates(&subject, &candidates);
        ranked.retain(|candidate| candidate.total >= min_score);
        ranked.truncate(limit);

        debug!(
            user_id = %user_id,
            considered = candidates.len(),
            returned = ranked.len(),
            "ranked co-founder candidates"
        );

        Ok(ranked)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
