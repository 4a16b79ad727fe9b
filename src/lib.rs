pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    provider_service::{build_provider, TextProvider},
    question_service::QuestionService,
    recency_service::RecencyTracker,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub question_service: QuestionService,
}

impl AppState {
    pub fn new(config: &Config, provider: Arc<dyn TextProvider>) -> Self {
        let recency = RecencyTracker::new(config.recency_capacity);
        let question_service = QuestionService::new(provider, recency)
            .with_max_attempts(config.max_attempts)
            .with_attempt_timeout(config.provider_timeout);

        Self { question_service }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = build_provider(config)?;
        Ok(Self::new(config, provider))
    }
}
