use serde::{Deserialize, Serialize};

/// The six compatibility categories and their fixed weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Roles,
    Industry,
    Commitment,
    Stage,
    Location,
    Languages,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Roles,
        ScoreCategory::Industry,
        ScoreCategory::Commitment,
        ScoreCategory::Stage,
        ScoreCategory::Location,
        ScoreCategory::Languages,
    ];

    pub fn max(self) -> u8 {
        match self {
            ScoreCategory::Roles => 30,
            ScoreCategory::Industry => 20,
            ScoreCategory::Commitment => 20,
            ScoreCategory::Stage => 10,
            ScoreCategory::Location => 10,
            ScoreCategory::Languages => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Roles => "Roles",
            ScoreCategory::Industry => "Industry",
            ScoreCategory::Commitment => "Commitment",
            ScoreCategory::Stage => "Stage",
            ScoreCategory::Location => "Location",
            ScoreCategory::Languages => "Languages",
        }
    }
}

/// Per-category compatibility between two profiles.
///
/// Values can only be produced by the scorer, which clamps every category to
/// its maximum, so a breakdown always totals somewhere in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreBreakdown {
    roles: u8,
    industry: u8,
    commitment: u8,
    stage: u8,
    location: u8,
    languages: u8,
}

impl ScoreBreakdown {
    pub(crate) fn from_parts(parts: [(ScoreCategory, u8); 6]) -> Self {
        let mut breakdown = ScoreBreakdown::default();
        for (category, score) in parts {
            let score = score.min(category.max());
            match category {
                ScoreCategory::Roles => breakdown.roles = score,
                ScoreCategory::Industry => breakdown.industry = score,
                ScoreCategory::Commitment => breakdown.commitment = score,
                ScoreCategory::Stage => breakdown.stage = score,
                ScoreCategory::Location => breakdown.location = score,
                ScoreCategory::Languages => breakdown.languages = score,
            }
        }
        breakdown
    }

    pub fn roles(&self) -> u8 {
        self.roles
    }

    pub fn industry(&self) -> u8 {
        self.industry
    }

    pub fn commitment(&self) -> u8 {
        self.commitment
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn location(&self) -> u8 {
        self.location
    }

    pub fn languages(&self) -> u8 {
        self.languages
    }

    pub fn get(&self, category: ScoreCategory) -> u8 {
        match category {
            ScoreCategory::Roles => self.roles,
            ScoreCategory::Industry => self.industry,
            ScoreCategory::Commitment => self.commitment,
            ScoreCategory::Stage => self.stage,
            ScoreCategory::Location => self.location,
            ScoreCategory::Languages => self.languages,
        }
    }

    pub fn total(&self) -> u8 {
        ScoreCategory::ALL
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }

    pub fn components(&self) -> Vec<ScoreComponent> {
        ScoreCategory::ALL
            .iter()
            .map(|category| ScoreComponent {
                category: *category,
                score: self.get(*category),
                max: category.max(),
            })
            .collect()
    }
}

/// Single category row, for transparent match explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub category: ScoreCategory,
    pub score: u8,
    pub max: u8,
}
