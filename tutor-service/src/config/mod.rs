use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Gemini REST endpoint used unless `GEMINI_API_BASE` says otherwise.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model answering tutor questions unless `GEMINI_MODEL` says otherwise.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct TutorConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Client-side timeout for the generation call. None leaves the call unbounded.
    pub timeout_secs: Option<u64>,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl TutorConfig {
    /// Load configuration once at process start. Fails if the Gemini API key is missing.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(TutorConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None)?),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: parse_timeout(env::var("GEMINI_TIMEOUT_SECS").ok())?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Option<u64>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        }),
    }
}
