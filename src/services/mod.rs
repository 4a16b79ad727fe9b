pub mod provider_service;
pub mod question_service;
pub mod recency_service;
pub mod shuffle_service;
