use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite:recruitwave.db";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_OLLAMA_MODEL: &str = "mistral";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every value has a local-development default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub inference_timeout_secs: u64,
    pub upload_dir: String,
    /// Request body cap for `POST /resumes/`.
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            inference_timeout_secs: env_or("INFERENCE_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("INFERENCE_TIMEOUT_SECS must be a whole number of seconds")?,
            upload_dir: env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a whole number of bytes")?,
            cors_origins: parse_origins(&env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: in-memory database, unroutable inference endpoint.
    pub fn for_tests(upload_dir: &str) -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            ollama_url: "http://127.0.0.1:9/api/generate".to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            inference_timeout_secs: 1,
            upload_dir: upload_dir.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
