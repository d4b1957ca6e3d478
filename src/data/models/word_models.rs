use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::data::models::{CefrLevel, Gender, PartOfSpeech};
use crate::schema::words;
use crate::srs::{MasteryBand, SrsState};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;
pub const DEFAULT_DUE_LIMIT: i64 = 20;
pub const MAX_DUE_LIMIT: i64 = 100;

#[derive(Error, Debug)]
pub enum WordError {
    #[error("Word not found")]
    NotFound,
    #[error("Word already exists: {0}")]
    Duplicate(String),
    #[error("Word was modified by a concurrent review")]
    Conflict,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(String),
}

/// Vocabulary word as stored, descriptive columns plus its SRS state.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = words)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Word {
    pub word_id: i32,
    pub user_id: i32,
    pub term: String,
    pub translation: String,
    pub part_of_speech: String,
    pub gender: Option<String>,
    pub cefr_level: String,
    pub mastery_score: i32,
    pub ease_factor: f64,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub correct_streak: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub version: i32, // Bumped on every write, used to detect stale snapshots
}

impl Word {
    pub fn srs_state(&self) -> SrsState {
        SrsState {
            mastery_score: self.mastery_score,
            ease_factor: self.ease_factor,
            correct_count: self.correct_count,
            wrong_count: self.wrong_count,
            correct_streak: self.correct_streak,
            next_review_at: self.next_review_at,
            last_reviewed_at: self.last_reviewed_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = words)]
pub struct NewWord<'a> {
    pub user_id: i32,
    pub term: &'a str,
    pub translation: &'a str,
    pub part_of_speech: &'a str,
    pub gender: Option<&'a str>,
    pub cefr_level: &'a str,
    pub mastery_score: i32,
    pub ease_factor: f64,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub correct_streak: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub version: i32,
}

impl<'a> NewWord<'a> {
    /// A new word starts with the initial SRS state and is due at `now`.
    pub fn new(user_id: i32, request: &'a CreateWordRequest, now: NaiveDateTime) -> Self {
        let state = SrsState::new(now);
        Self {
            user_id,
            term: &request.term,
            translation: &request.translation,
            part_of_speech: request.part_of_speech.as_str(),
            gender: request.gender.map(|g| g.as_str()),
            cefr_level: request.cefr_level.as_str(),
            mastery_score: state.mastery_score,
            ease_factor: state.ease_factor,
            correct_count: state.correct_count,
            wrong_count: state.wrong_count,
            correct_streak: state.correct_streak,
            next_review_at: state.next_review_at,
            last_reviewed_at: state.last_reviewed_at,
            created_at: now,
            version: 0,
        }
    }
}

/// Full replacement of the scheduling columns after a review.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = words)]
#[diesel(treat_none_as_null = true)]
pub struct SrsChangeset {
    pub mastery_score: i32,
    pub ease_factor: f64,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub correct_streak: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub version: i32,
}

impl SrsChangeset {
    pub fn new(state: &SrsState, version: i32) -> Self {
        Self {
            mastery_score: state.mastery_score,
            ease_factor: state.ease_factor,
            correct_count: state.correct_count,
            wrong_count: state.wrong_count,
            correct_streak: state.correct_streak,
            next_review_at: state.next_review_at,
            last_reviewed_at: state.last_reviewed_at,
            version,
        }
    }
}

/// Partial update of the descriptive columns. SRS columns are not editable.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = words)]
pub struct WordChangeset<'a> {
    pub term: Option<&'a str>,
    pub translation: Option<&'a str>,
    pub part_of_speech: Option<&'a str>,
    pub gender: Option<Option<&'a str>>,
    pub cefr_level: Option<&'a str>,
}

impl<'a> From<&'a UpdateWordRequest> for WordChangeset<'a> {
    fn from(request: &'a UpdateWordRequest) -> Self {
        Self {
            term: request.term.as_deref(),
            translation: request.translation.as_deref(),
            part_of_speech: request.part_of_speech.map(|p| p.as_str()),
            gender: request.gender.map(|g| g.map(|g| g.as_str())),
            cefr_level: request.cefr_level.map(|c| c.as_str()),
        }
    }
}

/// Request payload for adding a word
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWordRequest {
    #[validate(length(min = 1, max = 200, message = "Term must be 1-200 characters"))]
    pub term: String,
    #[validate(length(min = 1, max = 200, message = "Translation must be 1-200 characters"))]
    pub translation: String,
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub cefr_level: CefrLevel,
}

/// Request payload for editing a word; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWordRequest {
    #[validate(length(min = 1, max = 200, message = "Term must be 1-200 characters"))]
    pub term: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Translation must be 1-200 characters"))]
    pub translation: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
    /// `null` clears the gender, e.g. after a noun is recategorised.
    #[serde(default, deserialize_with = "explicit_null")]
    pub gender: Option<Option<Gender>>,
    pub cefr_level: Option<CefrLevel>,
}

/// Absent field -> `None`, explicit `null` -> `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListWordsParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub part_of_speech: Option<PartOfSpeech>,
    pub cefr_level: Option<CefrLevel>,
    pub search: Option<String>,
}

/// Normalised listing filter used by the repository.
#[derive(Debug, Clone, Default)]
pub struct WordFilter {
    pub part_of_speech: Option<PartOfSpeech>,
    pub cefr_level: Option<CefrLevel>,
    pub search: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl From<ListWordsParams> for WordFilter {
    fn from(params: ListWordsParams) -> Self {
        Self {
            part_of_speech: params.part_of_speech,
            cefr_level: params.cefr_level,
            search: params
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            skip: params.skip.unwrap_or(0).max(0),
            limit: params
                .limit
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .clamp(1, MAX_LIST_LIMIT),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DueWordsParams {
    pub limit: Option<i64>,
}

impl DueWordsParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_DUE_LIMIT).clamp(1, MAX_DUE_LIMIT)
    }
}

/// Outcome of one drill answer
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub correct: bool,
    #[serde(default)]
    pub response_time_ms: Option<u64>, // Recorded in logs only, never weights the schedule
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub word_id: i32,
    pub new_mastery_score: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub correct_count: i32,
    pub wrong_count: i32,
}

impl From<&Word> for ReviewResponse {
    fn from(word: &Word) -> Self {
        Self {
            word_id: word.word_id,
            new_mastery_score: word.mastery_score,
            next_review_at: word.next_review_at,
            correct_count: word.correct_count,
            wrong_count: word.wrong_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub id: i32,
    pub user_id: i32,
    pub term: String,
    pub translation: String,
    pub part_of_speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub cefr_level: String,
    pub mastery_score: i32,
    pub band: MasteryBand,
    pub ease_factor: f64,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub correct_streak: i32,
    pub next_review_at: Option<NaiveDateTime>,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<Word> for WordResponse {
    fn from(word: Word) -> Self {
        let band = MasteryBand::from_score(word.mastery_score);
        Self {
            id: word.word_id,
            user_id: word.user_id,
            term: word.term,
            translation: word.translation,
            part_of_speech: word.part_of_speech,
            gender: word.gender,
            cefr_level: word.cefr_level,
            mastery_score: word.mastery_score,
            band,
            ease_factor: word.ease_factor,
            correct_count: word.correct_count,
            wrong_count: word.wrong_count,
            correct_streak: word.correct_streak,
            next_review_at: word.next_review_at,
            last_reviewed_at: word.last_reviewed_at,
            created_at: word.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Standard API response format
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}
