use crate::dto::quiz_dto::{CategoriesResponse, NextQuestionRequest};
use crate::models::difficulty::Difficulty;
use crate::models::question::QuestionRecord;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:9321";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not reach the quiz service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quiz service answered {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Clone)]
pub struct QuizClient {
    client: Client,
    base_url: String,
}

impl QuizClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn next_question(
        &self,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<QuestionRecord, ClientError> {
        let body = NextQuestionRequest {
            category: category.to_string(),
            difficulty: Some(difficulty.to_string()),
        };
        let res = self
            .client
            .post(format!("{}/quiz/next", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(server_error(res).await);
        }
        Ok(res.json().await?)
    }

    pub async fn categories(&self) -> Result<CategoriesResponse, ClientError> {
        let res = self
            .client
            .get(format!("{}/quiz/categories", self.base_url))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(server_error(res).await);
        }
        Ok(res.json().await?)
    }
}

async fn server_error(res: reqwest::Response) -> ClientError {
    let status = res.status().as_u16();
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<JsonValue>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(text);
    ClientError::Server { status, message }
}
