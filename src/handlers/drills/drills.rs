use axum::extract::{Json, Path, State};
use validator::Validate;

use crate::{
    AppState,
    data::{
        models::{
            DrillAnswerRequest, DrillAnswerResponse, DrillItem, DrillSessionRequest,
            DrillSessionResponse, WordError,
        },
        repositories::WordRepository,
    },
    features::drill,
    utils,
};

pub async fn start_drill(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(payload): Json<DrillSessionRequest>,
) -> Result<Json<DrillSessionResponse>, WordError> {
    payload.validate()?;

    let now = utils::now();
    let mut conn = utils::get_conn(&state.pool)?;
    let words = drill::select_drill_words(
        &mut conn,
        user_id,
        payload.count as usize,
        now,
        &mut rand::thread_rng(),
    )?;

    let items: Vec<DrillItem> = words
        .iter()
        .map(|word| DrillItem::new(word, payload.direction, now))
        .collect();

    Ok(Json(DrillSessionResponse {
        direction: payload.direction,
        total_count: items.len(),
        items,
    }))
}

pub async fn check_drill_answer(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(payload): Json<DrillAnswerRequest>,
) -> Result<Json<DrillAnswerResponse>, WordError> {
    payload.validate()?;

    let mut conn = utils::get_conn(&state.pool)?;
    let word = WordRepository::get(&mut conn, payload.word_id, user_id)?
        .ok_or(WordError::NotFound)?;

    let expected = payload.direction.expected(&word);

    Ok(Json(DrillAnswerResponse {
        correct: drill::check_answer(expected, &payload.user_answer),
        expected_answer: expected.to_string(),
        user_answer: payload.user_answer,
        word_id: word.word_id,
    }))
}
