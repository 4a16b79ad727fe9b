use crate::error::{AttemptError, Error, GenerationError, Result};
use crate::models::difficulty::Difficulty;
use crate::models::question::{GeneratedQuestion, Label, Options, QuestionRecord};
use crate::services::provider_service::TextProvider;
use crate::services::recency_service::RecencyTracker;
use crate::services::shuffle_service::shuffle_options;
use crate::utils::fence::strip_code_fence;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: usize = 4;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_prompt(category: &str, difficulty: Difficulty) -> String {
    format!(
        r#"You are a quiz generator. Create exactly ONE high-quality multiple-choice question in English.

Topic category: {category}
Target difficulty: {difficulty}

Output STRICTLY a compact JSON object with these keys and nothing else:
{{
  "question": "...",
  "options": {{"A": "...", "B": "...", "C": "...", "D": "..."}},
  "answer": "A|B|C|D",
  "explanation": "short reason (1 sentence)"
}}

Rules:
- Make options concise and mutually exclusive.
- Ensure only one correct answer.
- Do not use markdown, backticks, or extra commentary.
- Keep the explanation short and factual."#
    )
}

/// Parses one provider reply into a validated question.
pub fn parse_question(raw: &str) -> std::result::Result<GeneratedQuestion, AttemptError> {
    let value: JsonValue = serde_json::from_str(strip_code_fence(raw))?;

    let question = value
        .get("question")
        .and_then(|q| q.as_str())
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AttemptError::Schema("question is missing or empty".to_string()))?
        .to_string();

    let options = coerce_options(value.get("options"))?;

    let answer = value
        .get("answer")
        .and_then(|a| a.as_str())
        .ok_or_else(|| AttemptError::Schema("answer is missing".to_string()))?
        .parse::<Label>()
        .map_err(|e| AttemptError::Schema(format!("answer {}", e)))?;

    let explanation = value
        .get("explanation")
        .and_then(|e| e.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    Ok(GeneratedQuestion {
        question,
        options,
        answer,
        explanation,
    })
}

fn coerce_options(raw: Option<&JsonValue>) -> std::result::Result<Options, AttemptError> {
    let map = raw
        .and_then(|o| o.as_object())
        .ok_or_else(|| AttemptError::Schema("options must be an object".to_string()))?;

    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    if keys != ["A", "B", "C", "D"] {
        return Err(AttemptError::Schema(format!(
            "options keys must be exactly A-D, got {:?}",
            keys
        )));
    }

    let text = |label: Label| {
        map.get(label.as_str())
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AttemptError::Schema(format!("option {} is not text", label)))
    };
    Ok(Options::new(
        text(Label::A)?,
        text(Label::B)?,
        text(Label::C)?,
        text(Label::D)?,
    ))
}

#[derive(Clone)]
pub struct QuestionService {
    provider: Arc<dyn TextProvider>,
    recency: RecencyTracker,
    max_attempts: usize,
    attempt_timeout: Duration,
}

impl QuestionService {
    pub fn new(provider: Arc<dyn TextProvider>, recency: RecencyTracker) -> Self {
        Self {
            provider,
            recency,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn recency(&self) -> &RecencyTracker {
        &self.recency
    }

    /// Asks the provider until it yields a valid question not recently shown
    /// for this key. Does not record anything as seen.
    pub async fn generate_unique(
        &self,
        category: &str,
        difficulty: Difficulty,
        max_attempts: usize,
    ) -> std::result::Result<GeneratedQuestion, GenerationError> {
        let attempts = max_attempts.max(1);
        let prompt = build_prompt(category, difficulty);
        let mut last = AttemptError::Duplicate;

        for attempt in 1..=attempts {
            match self.attempt(&prompt, category, difficulty).await {
                Ok(question) => {
                    tracing::info!(
                        attempt,
                        category,
                        difficulty = %difficulty,
                        "Generated unique question"
                    );
                    return Ok(question);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        category,
                        difficulty = %difficulty,
                        error = %e,
                        "Question attempt discarded"
                    );
                    last = e;
                }
            }
        }

        tracing::error!(attempts, category, difficulty = %difficulty, error = %last, "Question generation exhausted");
        Err(GenerationError::Exhausted { attempts, last })
    }

    async fn attempt(
        &self,
        prompt: &str,
        category: &str,
        difficulty: Difficulty,
    ) -> std::result::Result<GeneratedQuestion, AttemptError> {
        let raw = tokio::time::timeout(self.attempt_timeout, self.provider.complete(prompt))
            .await
            .map_err(|_| AttemptError::Timeout(self.attempt_timeout))?
            .map_err(|e| AttemptError::Provider(e.to_string()))?;

        let question = parse_question(&raw)?;
        if self
            .recency
            .is_seen(category, difficulty.as_str(), &question.question)
        {
            return Err(AttemptError::Duplicate);
        }
        Ok(question)
    }

    /// Full request path: unique question, shuffled answers, recorded as seen.
    pub async fn next_question(
        &self,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<QuestionRecord> {
        let generated = self
            .generate_unique(category, difficulty, self.max_attempts)
            .await?;

        let (options, answer) =
            shuffle_options(&generated.options, generated.answer, &mut rand::thread_rng());
        if options.get(answer) != generated.options.get(generated.answer) {
            return Err(Error::Internal(
                "correct answer changed while shuffling options".to_string(),
            ));
        }
        self.recency
            .mark_seen(category, difficulty.as_str(), &generated.question);

        Ok(QuestionRecord::new(
            category,
            difficulty,
            GeneratedQuestion {
                options,
                answer,
                ..generated
            },
        ))
    }
}
