use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::inference::InferenceProvider;
use crate::tools::{Params, ToolRegistry};
use crate::types::{InferenceRequest, ResponseFormat, StopReason, Usage};

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub tool_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Params,
}

impl PlanStep {
    pub fn new(tool_name: impl Into<String>, params: Params) -> Self {
        Self {
            tool_name: tool_name.into(),
            params,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Params>::deserialize(deserializer)?.unwrap_or_default())
}

/// Model output that could not be turned into a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRejection {
    pub reason: String,
    pub raw: String,
}

/// The planner's verdict. Empty `steps` with no rejection means the model
/// decided no tool was needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub rejected: Option<PlanRejection>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Deserialize)]
struct PlanEnvelope {
    plan: Vec<PlanStep>,
}

/// Asks the model which tools to call for a request.
pub struct Planner<'a> {
    provider: &'a dyn InferenceProvider,
    tools: &'a ToolRegistry,
    model: &'a str,
    max_tokens: Option<u32>,
}

impl<'a> Planner<'a> {
    pub fn new(
        provider: &'a dyn InferenceProvider,
        tools: &'a ToolRegistry,
        model: &'a str,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            provider,
            tools,
            model,
            max_tokens,
        }
    }

    /// Produce a plan. Unusable model output becomes an empty, rejected plan;
    /// only a failed completion call is an error.
    pub async fn plan(&self, query: &str) -> Result<(Plan, Usage), InferenceError> {
        let request = InferenceRequest::user(self.model, planning_prompt(&self.tools.catalog(), query))
            .with_max_tokens(self.max_tokens)
            .with_response_format(ResponseFormat::JsonObject);

        let response = self.provider.infer(request).await?;
        if response.stop_reason == StopReason::MaxTokens {
            debug!("plan response hit max_tokens, parsing what arrived");
        }

        let plan = parse_plan(&response.text);
        if let Some(ref rejection) = plan.rejected {
            warn!(
                reason = %rejection.reason,
                raw = %rejection.raw,
                "failed to parse plan"
            );
        }

        Ok((plan, response.usage))
    }
}

pub fn planning_prompt(catalog: &str, query: &str) -> String {
    format!(
        r#"You are a dispatch assistant. Analyse the user's request and decide which tools must be called to fulfil it.

[Available tools]
{catalog}

[User request]
{query}

[Output format]
Reply with a single JSON object and nothing else, no prose and no explanation:
{{
  "plan": [
    {{
      "tool_name": "name of the tool",
      "params": {{ "parameter name": "parameter value" }}
    }}
  ]
}}
If no tool is needed, reply with {{"plan": []}}."#
    )
}

/// Best-effort parse of the planner's reply. Never fails: anything unusable
/// yields an empty plan carrying the rejection reason.
pub fn parse_plan(raw: &str) -> Plan {
    let reject = |reason: String| Plan {
        steps: Vec::new(),
        rejected: Some(PlanRejection {
            reason,
            raw: raw.to_string(),
        }),
    };

    let value: Value = match serde_json::from_str(strip_code_fence(raw)) {
        Ok(v) => v,
        Err(e) => return reject(format!("invalid JSON: {e}")),
    };

    if !value.is_object() {
        return reject("expected a JSON object with a \"plan\" key".into());
    }

    if value.get("plan").is_none() {
        return reject("missing \"plan\" key".into());
    }

    match serde_json::from_value::<PlanEnvelope>(value) {
        Ok(envelope) => Plan {
            steps: envelope.plan,
            rejected: None,
        },
        Err(e) => reject(format!("malformed plan: {e}")),
    }
}

/// Models sometimes wrap JSON in a Markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
