#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Expected tool failures. Rendered as text and handed to the model like any
/// other tool output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Error: missing required parameter '{0}'")]
    MissingParameter(String),
    #[error("Error: {service} request failed - {message}")]
    Upstream { service: String, message: String },
    #[error("Error: {0}")]
    MissingData(String),
    #[error("Error: no tool named '{0}' is registered")]
    NotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}
