use crate::models::difficulty::{Difficulty, SUGGESTED_CATEGORIES};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NextQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub difficulties: Vec<Difficulty>,
}

impl Default for CategoriesResponse {
    fn default() -> Self {
        Self {
            categories: SUGGESTED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            difficulties: Difficulty::ALL.to_vec(),
        }
    }
}
