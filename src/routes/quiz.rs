use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use validator::Validate;

use crate::dto::quiz_dto::{CategoriesResponse, NextQuestionRequest};
use crate::error::{Error, Result};
use crate::models::difficulty::Difficulty;
use crate::models::question::QuestionRecord;
use crate::AppState;

#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NextQuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionRecord>> {
    let Json(req) = payload.map_err(|e| Error::BadRequest(e.body_text()))?;
    req.validate()?;

    let category = req.category.trim();
    if category.is_empty() {
        return Err(Error::BadRequest("category must not be blank".to_string()));
    }
    let difficulty = match req.difficulty.as_deref() {
        Some(raw) => raw.parse::<Difficulty>().map_err(Error::BadRequest)?,
        None => Difficulty::default(),
    };

    tracing::info!(category, difficulty = %difficulty, "Next question requested");
    let record = state
        .question_service
        .next_question(category, difficulty)
        .await?;
    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse::default())
}
