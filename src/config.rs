use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider '{}', expected gemini|openai", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub provider_timeout: Duration,
    pub max_attempts: usize,
    pub recency_capacity: usize,
    pub quiz_rps: u32,
    pub cors_origins: Vec<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let provider: ProviderKind = get_env_or("LLM_PROVIDER", "gemini")
            .parse()
            .map_err(Error::Config)?;
        let (api_key, model) = match provider {
            ProviderKind::Gemini => (
                get_env("GEMINI_API_KEY")?,
                get_env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            ),
            ProviderKind::OpenAi => (
                get_env("OPENAI_API_KEY")?,
                get_env_or("OPENAI_MODEL", "gpt-4o-mini"),
            ),
        };

        let max_attempts: usize = get_env_parse_or("MAX_ATTEMPTS", 4)?;
        if max_attempts == 0 {
            return Err(Error::Config("MAX_ATTEMPTS must be at least 1".to_string()));
        }
        let recency_capacity: usize = get_env_parse_or("RECENCY_CAPACITY", 50)?;
        if recency_capacity == 0 {
            return Err(Error::Config("RECENCY_CAPACITY must be at least 1".to_string()));
        }

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:9321"),
            provider,
            api_key,
            model,
            provider_timeout: Duration::from_secs(get_env_parse_or("PROVIDER_TIMEOUT_SECS", 30)?),
            max_attempts,
            recency_capacity,
            quiz_rps: get_env_parse_or("QUIZ_RPS", 20)?,
            cors_origins: parse_origins(&get_env_or(
                "CORS_ORIGINS",
                "http://localhost:8501,http://127.0.0.1:8501",
            )),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn get_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
