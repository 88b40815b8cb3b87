use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Parameters for a single tool call, as produced by the planner.
pub type Params = Map<String, Value>;

/// What a tool call produced. Errors are data: the executor records them and
/// the synthesizer sees their rendered text.
pub type ToolOutcome = Result<String, ToolError>;

/// A named capability the planner can ask for. Consumers implement this for
/// each data source.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier used for dispatch.
    fn name(&self) -> &str;

    /// Purpose and expected parameters, shown to the planner verbatim.
    fn description(&self) -> &str;

    async fn execute(&self, params: &Params) -> ToolOutcome;
}

/// Read a required string parameter. Numbers and booleans are accepted and
/// rendered as text; absent, null and blank values are missing.
pub fn required_param(params: &Params, key: &str) -> Result<String, ToolError> {
    let value = match params.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };

    if value.is_empty() {
        return Err(ToolError::MissingParameter(key.to_string()));
    }
    Ok(value)
}
