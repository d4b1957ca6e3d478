use axum::extract::{Json, Path, State};

use crate::{
    AppState,
    data::{
        models::{ReviewRequest, ReviewResponse, WordError},
        repositories::WordRepository,
    },
    utils,
};

/// Submits one drill answer and returns the rescheduled state.
#[axum::debug_handler]
pub async fn review_word(
    State(state): State<AppState>,
    Path((user_id, word_id)): Path<(i32, i32)>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;

    let word = WordRepository::record_review(
        &mut conn,
        word_id,
        user_id,
        payload.correct,
        utils::now(),
    )?;

    log::info!(
        "User {} reviewed word {}: correct={} mastery={} response_time_ms={:?}",
        user_id,
        word_id,
        payload.correct,
        word.mastery_score,
        payload.response_time_ms
    );

    Ok(Json(ReviewResponse::from(&word)))
}
