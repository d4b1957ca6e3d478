use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::{
        drills::drills,
        words::{due, review, words},
    },
};

/// Builds the JSON API. Every route is scoped to the learner in the path.
pub fn app(state: AppState) -> Router {
    let words_router = Router::new()
        .route("/", get(words::list_words).post(words::create_word))
        .route("/count", get(words::count_words))
        .route("/due", get(due::due_words))
        .route("/due/count", get(due::count_due_words))
        .route(
            "/{word_id}",
            get(words::get_word)
                .patch(words::update_word)
                .delete(words::delete_word),
        )
        .route("/{word_id}/review", post(review::review_word));

    let drills_router = Router::new()
        .route("/", post(drills::start_drill))
        .route("/check", post(drills::check_drill_answer));

    let user_router = Router::new()
        .nest("/words", words_router)
        .nest("/drills", drills_router);

    Router::new()
        .nest("/api/users/{user_id}", user_router)
        .with_state(state)
}
