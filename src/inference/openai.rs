use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::InferenceProvider;
use crate::error::InferenceError;
use crate::types::{InferenceRequest, InferenceResponse, StopReason, Usage};

/// Zhipu's OpenAI-compatible GLM endpoint.
pub const ZHIPU_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// OpenAI-compatible provider. Works with Zhipu GLM, OpenAI, vLLM, OpenRouter,
/// or any server that implements `{base_url}/chat/completions`.
///
/// The base URL includes the API version segment (`.../v1`, `.../api/paas/v4`).
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Set an API key (sent as a bearer token).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_body(request: &InferenceRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(ref sys) = request.system {
            messages.push(json!({ "role": "system", "content": sys }));
        }
        messages.extend(request.messages.iter().cloned());

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(format) = request.response_format {
            body["response_format"] = json!({ "type": format.as_str() });
        }

        body
    }

    fn parse_response(text: &str) -> Result<InferenceResponse, InferenceError> {
        let parsed: Value =
            serde_json::from_str(text).map_err(|e| InferenceError::Parse(e.to_string()))?;

        let choice = &parsed["choices"][0];
        if choice.is_null() {
            return Err(InferenceError::Parse("response has no choices".into()));
        }

        let stop_reason = match choice["finish_reason"].as_str().unwrap_or("stop") {
            "length" => StopReason::MaxTokens,
            "stop" => StopReason::EndTurn,
            other => {
                debug!(finish_reason = %other, "unknown finish_reason, treating as EndTurn");
                StopReason::EndTurn
            }
        };

        let text = choice["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        let usage = Usage {
            input_tokens: parsed["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: parsed["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok(InferenceResponse {
            stop_reason,
            text,
            usage,
        })
    }
}

#[async_trait]
impl InferenceProvider for OpenAiProvider {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let body = Self::build_body(&request);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            json_mode = request.response_format.is_some(),
            "chat completion request"
        );

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("content-type", "application/json");

        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        if status != 200 {
            return Err(InferenceError::ApiError { status, body: text });
        }

        Self::parse_response(&text)
    }
}
