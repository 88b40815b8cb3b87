use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::handler::{required_param, Params, Tool, ToolOutcome};
use crate::error::ToolError;

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current conditions for a city from OpenWeatherMap.
pub struct WeatherTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: String,
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

impl WeatherTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENWEATHER_URL.into(),
            units: "metric".into(),
            lang: "zh_cn".into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Language code for condition descriptions (`zh_cn`, `en`, ...).
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    async fn fetch(&self, city: &str) -> Result<Value, ToolError> {
        // The request URL carries `appid`; keep it out of the message.
        let upstream = |e: reqwest::Error| ToolError::Upstream {
            service: "weather API".into(),
            message: e.without_url().to_string(),
        };

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(upstream)?
            .error_for_status()
            .map_err(upstream)?;

        let text = resp.text().await.map_err(upstream)?;
        serde_json::from_str(&text).map_err(|e| ToolError::Upstream {
            service: "weather API".into(),
            message: format!("invalid JSON body: {e}"),
        })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city. Params: {\"city\": \"city name\"}"
    }

    async fn execute(&self, params: &Params) -> ToolOutcome {
        let city = required_param(params, "city")?;
        debug!(city = %city, "fetching current weather");

        let body = self.fetch(&city).await?;
        let missing = || ToolError::MissingData(format!("no weather data found for city '{city}'"));

        let current: CurrentWeather = serde_json::from_value(body).map_err(|_| missing())?;
        let condition = current.weather.first().ok_or_else(missing)?;

        Ok(format!(
            "Weather in {}: {}, temperature {}°C, feels like {}°C, humidity {}%",
            current.name,
            condition.description,
            current.main.temp,
            current.main.feels_like,
            current.main.humidity,
        ))
    }
}
