use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    data::{
        models::{
            ApiResponse, CountResponse, CreateWordRequest, ListWordsParams, UpdateWordRequest,
            WordError, WordFilter, WordResponse,
        },
        repositories::WordRepository,
    },
    utils,
};

pub async fn list_words(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<ListWordsParams>,
) -> Result<Json<Vec<WordResponse>>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;
    let filter = WordFilter::from(params);

    let words = WordRepository::list(&mut conn, user_id, &filter)?
        .into_iter()
        .map(WordResponse::from)
        .collect();

    Ok(Json(words))
}

pub async fn count_words(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<ListWordsParams>,
) -> Result<Json<CountResponse>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;
    let count = WordRepository::count(&mut conn, user_id, &WordFilter::from(params))?;
    Ok(Json(CountResponse { count }))
}

pub async fn create_word(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(payload): Json<CreateWordRequest>,
) -> Result<(StatusCode, Json<WordResponse>), WordError> {
    payload.validate()?;

    let mut conn = utils::get_conn(&state.pool)?;
    let word = WordRepository::create(&mut conn, user_id, &payload, utils::now())?;
    log::info!("User {} added word {} ({})", user_id, word.word_id, word.term);

    Ok((StatusCode::CREATED, Json(word.into())))
}

pub async fn get_word(
    State(state): State<AppState>,
    Path((user_id, word_id)): Path<(i32, i32)>,
) -> Result<Json<WordResponse>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;
    let word = WordRepository::get(&mut conn, word_id, user_id)?.ok_or(WordError::NotFound)?;
    Ok(Json(word.into()))
}

pub async fn update_word(
    State(state): State<AppState>,
    Path((user_id, word_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateWordRequest>,
) -> Result<Json<WordResponse>, WordError> {
    payload.validate()?;

    let mut conn = utils::get_conn(&state.pool)?;
    let word = WordRepository::update(&mut conn, word_id, user_id, &payload)?
        .ok_or(WordError::NotFound)?;
    Ok(Json(word.into()))
}

pub async fn delete_word(
    State(state): State<AppState>,
    Path((user_id, word_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse>, WordError> {
    let mut conn = utils::get_conn(&state.pool)?;

    if !WordRepository::delete(&mut conn, word_id, user_id)? {
        return Err(WordError::NotFound);
    }

    Ok(Json(ApiResponse {
        success: true,
        message: "Word deleted successfully".to_string(),
    }))
}
