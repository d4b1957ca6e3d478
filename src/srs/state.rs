use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_MASTERY_SCORE: i32 = 1000;

/// Mastery score at which a word counts as mastered on dashboards.
pub const MASTERED_THRESHOLD: i32 = 700;

/// The scheduling fields of a vocabulary item.
///
/// The scheduler reads a snapshot of this and returns a full replacement;
/// it never sees the descriptive columns of a word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrsState {
    pub mastery_score: i32,
    pub ease_factor: f64,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub correct_streak: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl SrsState {
    /// State of a freshly added word: due immediately.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            mastery_score: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            correct_count: 0,
            wrong_count: 0,
            correct_streak: 0,
            next_review_at: Some(now),
            last_reviewed_at: None,
        }
    }

    /// A missing `next_review_at` means the item is due now.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.next_review_at.is_none_or(|at| at <= now)
    }

    pub fn band(&self) -> MasteryBand {
        MasteryBand::from_score(self.mastery_score)
    }

    pub fn total_reviews(&self) -> i32 {
        self.correct_count.saturating_add(self.wrong_count)
    }

    /// Clamps a malformed snapshot back into the documented domain.
    pub(crate) fn sanitized(self) -> Self {
        let ease_factor = if self.ease_factor.is_finite() {
            self.ease_factor.max(MIN_EASE_FACTOR)
        } else {
            INITIAL_EASE_FACTOR
        };

        Self {
            mastery_score: self.mastery_score.clamp(0, MAX_MASTERY_SCORE),
            ease_factor,
            correct_count: self.correct_count.max(0),
            wrong_count: self.wrong_count.max(0),
            correct_streak: self.correct_streak.max(0),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryBand {
    New,
    Learning,
    Mastered,
}

impl MasteryBand {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s <= 0 => MasteryBand::New,
            s if s < MASTERED_THRESHOLD => MasteryBand::Learning,
            _ => MasteryBand::Mastered,
        }
    }
}
