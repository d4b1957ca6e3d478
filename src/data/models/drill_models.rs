use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::Word;

pub const DEFAULT_DRILL_COUNT: u32 = 10;

/// Which side of the word is shown as the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillDirection {
    Forward, // prompt = term, answer = translation
    Reverse, // prompt = translation, answer = term
}

impl DrillDirection {
    pub fn prompt<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            DrillDirection::Forward => &word.term,
            DrillDirection::Reverse => &word.translation,
        }
    }

    pub fn expected<'a>(&self, word: &'a Word) -> &'a str {
        match self {
            DrillDirection::Forward => &word.translation,
            DrillDirection::Reverse => &word.term,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DrillSessionRequest {
    pub direction: DrillDirection,
    #[serde(default = "default_drill_count")]
    #[validate(range(min = 1, max = 50, message = "Count must be between 1 and 50"))]
    pub count: u32,
}

fn default_drill_count() -> u32 {
    DEFAULT_DRILL_COUNT
}

#[derive(Debug, Serialize)]
pub struct DrillItem {
    pub word_id: i32,
    pub prompt: String,
    pub expected_answer: String,
    pub part_of_speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub cefr_level: String,
    pub due: bool, // false for words pulled in to fill the session
}

impl DrillItem {
    pub fn new(word: &Word, direction: DrillDirection, now: NaiveDateTime) -> Self {
        Self {
            word_id: word.word_id,
            prompt: direction.prompt(word).to_string(),
            expected_answer: direction.expected(word).to_string(),
            part_of_speech: word.part_of_speech.clone(),
            gender: word.gender.clone(),
            cefr_level: word.cefr_level.clone(),
            due: word.srs_state().is_due(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrillSessionResponse {
    pub direction: DrillDirection,
    pub items: Vec<DrillItem>,
    pub total_count: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DrillAnswerRequest {
    pub word_id: i32,
    #[validate(length(min = 1, message = "Answer must not be empty"))]
    pub user_answer: String,
    pub direction: DrillDirection,
}

#[derive(Debug, Serialize)]
pub struct DrillAnswerResponse {
    pub correct: bool,
    pub expected_answer: String,
    pub user_answer: String,
    pub word_id: i32,
}
