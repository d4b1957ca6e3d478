use axum::extract::{Json, Path, Query, State};

use crate::{
    AppState,
    data::{
        models::{CountResponse, DueWordsParams, WordError, WordResponse},
        repositories::WordRepository,
    },
    utils,
};

pub async fn due_words(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<DueWordsParams>,
) -> Result<Json<Vec<WordResponse>>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;

    let words = WordRepository::due_words(&mut conn, user_id, params.limit(), utils::now())?
        .into_iter()
        .map(WordResponse::from)
        .collect();

    Ok(Json(words))
}

pub async fn count_due_words(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<CountResponse>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;
    let count = WordRepository::count_due(&mut conn, user_id, utils::now())?;
    Ok(Json(CountResponse { count }))
}
