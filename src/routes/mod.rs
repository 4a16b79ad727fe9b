pub mod health;
pub mod quiz;

use axum::{
    routing::{get, post},
    Router,
};

use crate::middleware::rate_limit::{request_budget_middleware, RequestBudget};
use crate::AppState;

pub fn router(state: AppState, quiz_rps: u32) -> Router {
    let quiz_api = Router::new()
        .route("/quiz/next", post(quiz::next_question))
        .layer(axum::middleware::from_fn_with_state(
            RequestBudget::new(quiz_rps),
            request_budget_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/quiz/categories", get(quiz::list_categories))
        .merge(quiz_api)
        .with_state(state)
}
