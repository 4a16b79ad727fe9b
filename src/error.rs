use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Model returned bad data: {0}")]
    UpstreamData(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Why a single generation attempt was discarded.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("provider call failed: {0}")]
    Provider(String),

    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("model returned non-JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("model returned invalid schema: {0}")]
    Schema(String),

    #[error("question was asked recently")]
    Duplicate,
}

impl AttemptError {
    /// Malformed JSON and schema violations are the provider's data being wrong,
    /// as opposed to the provider being unreachable or repeating itself.
    pub fn is_bad_data(&self) -> bool {
        matches!(self, AttemptError::MalformedJson(_) | AttemptError::Schema(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no unique question available after {attempts} attempts: {last}")]
    Exhausted { attempts: usize, last: AttemptError },
}

impl From<GenerationError> for Error {
    fn from(err: GenerationError) -> Self {
        match &err {
            GenerationError::Exhausted { last, .. } if last.is_bad_data() => {
                Error::UpstreamData(err.to_string())
            }
            GenerationError::Exhausted { .. } => Error::GenerationFailed(err.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::UpstreamData(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Model returned bad data: {}", msg),
            ),
            Error::GenerationFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generation failed: {}", msg),
            ),
            Error::Reqwest(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generation failed: {}", err),
            ),
            Error::Anyhow(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generation failed: {}", err),
            ),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_on_bad_data_maps_to_bad_gateway() {
        let err: Error = GenerationError::Exhausted {
            attempts: 4,
            last: AttemptError::Schema("answer 'E' is not one of A-D".into()),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn exhaustion_on_duplicates_maps_to_generation_failed() {
        let err: Error = GenerationError::Exhausted {
            attempts: 4,
            last: AttemptError::Duplicate,
        }
        .into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_error_is_500_with_json_body() {
        let response = Error::Internal("answer lost in shuffle".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal error: answer lost in shuffle");
    }

    #[test]
    fn timeout_is_not_bad_data() {
        assert!(!AttemptError::Timeout(Duration::from_secs(1)).is_bad_data());
        assert!(!AttemptError::Provider("quota".into()).is_bad_data());
    }
}
