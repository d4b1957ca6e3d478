pub mod drill_models;
pub mod enums;
pub mod word_models;

pub use drill_models::{
    DrillAnswerRequest, DrillAnswerResponse, DrillDirection, DrillItem, DrillSessionRequest,
    DrillSessionResponse,
};
pub use enums::{CefrLevel, Gender, PartOfSpeech};
pub use word_models::{
    ApiResponse, CountResponse, CreateWordRequest, DueWordsParams, ListWordsParams, NewWord,
    ReviewRequest, ReviewResponse, SrsChangeset, UpdateWordRequest, Word, WordChangeset,
    WordError, WordFilter, WordResponse,
};
