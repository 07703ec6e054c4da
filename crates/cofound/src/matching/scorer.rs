use std::collections::BTreeSet;

use super::breakdown::{ScoreBreakdown, ScoreCategory};
use crate::profiles::{Location, Profile};

/// Compatibility of `subject` with `other`.
///
/// Every category rule is symmetric, so swapping the arguments yields the same
/// breakdown. Missing attributes on either side score zero for that category.
pub fn compute_score(subject: &Profile, other: &Profile) -> ScoreBreakdown {
    ScoreBreakdown::from_parts([
        (
            ScoreCategory::Roles,
            overlap_score(&subject.roles, &other.roles, ScoreCategory::Roles.max()),
        ),
        (
            ScoreCategory::Industry,
            overlap_score(
                &subject.industries,
                &other.industries,
                ScoreCategory::Industry.max(),
            ),
        ),
        (
            ScoreCategory::Commitment,
            proximity_score(
                subject.commitment.map(|level| level.rank()),
                other.commitment.map(|level| level.rank()),
                ScoreCategory::Commitment.max(),
            ),
        ),
        (
            ScoreCategory::Stage,
            proximity_score(
                subject.stage.map(|stage| stage.rank()),
                other.stage.map(|stage| stage.rank()),
                ScoreCategory::Stage.max(),
            ),
        ),
        (
            ScoreCategory::Location,
            location_score(
                subject.location.as_ref(),
                other.location.as_ref(),
                ScoreCategory::Location.max(),
            ),
        ),
        (
            ScoreCategory::Languages,
            overlap_score(
                &subject.languages,
                &other.languages,
                ScoreCategory::Languages.max(),
            ),
        ),
    ])
}

/// Jaccard overlap of two tag sets scaled into `max`.
pub(crate) fn overlap_score(left: &BTreeSet<String>, right: &BTreeSet<String>, max: u8) -> u8 {
    let left = normalized(left);
    let right = normalized(right);
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    let ratio = shared as f64 / union as f64;
    (f64::from(max) * ratio).round().clamp(0.0, f64::from(max)) as u8
}

/// Full marks for an exact match, half for neighbouring ranks.
pub(crate) fn proximity_score(left: Option<u8>, right: Option<u8>, max: u8) -> u8 {
    match (left, right) {
        (Some(left), Some(right)) => match left.abs_diff(right) {
            0 => max,
            1 => max / 2,
            _ => 0,
        },
        _ => 0,
    }
}

pub(crate) fn location_score(left: Option<&Location>, right: Option<&Location>, max: u8) -> u8 {
    let (Some(left), Some(right)) = (left, right) else {
        return 0;
    };

    let left_country = normalize(&left.country);
    if left_country.is_empty() || left_country != normalize(&right.country) {
        return 0;
    }

    let left_city = left.city.as_deref().map(normalize).filter(|city| !city.is_empty());
    let right_city = right.city.as_deref().map(normalize).filter(|city| !city.is_empty());
    match (left_city, right_city) {
        (Some(left), Some(right)) if left == right => max,
        _ => max / 2,
    }
}

fn normalized(values: &BTreeSet<String>) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| normalize(value))
        .filter(|value| !value.is_empty())
        .collect()
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
