use crate::error::ConfigError;

pub const LLM_API_KEY_ENV: &str = "ZHIPUAI_API_KEY";
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const MODEL_ENV: &str = "BRIEFING_MODEL";
pub const BASE_URL_ENV: &str = "BRIEFING_BASE_URL";

/// Credentials and endpoint overrides read from the environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub llm_api_key: String,
    pub weather_api_key: String,
    pub news_api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingEnv(key));

        Ok(Self {
            llm_api_key: require(LLM_API_KEY_ENV)?,
            weather_api_key: require(WEATHER_API_KEY_ENV)?,
            news_api_key: require(NEWS_API_KEY_ENV)?,
            model: get(MODEL_ENV),
            base_url: get(BASE_URL_ENV),
        })
    }
}
