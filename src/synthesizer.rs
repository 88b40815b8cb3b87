use tracing::warn;

use crate::error::InferenceError;
use crate::executor::{outcome_text, ExecutionResults};
use crate::inference::InferenceProvider;
use crate::types::{InferenceRequest, StopReason, Usage};

/// Turns tool results into the final report.
pub struct Synthesizer<'a> {
    provider: &'a dyn InferenceProvider,
    model: &'a str,
    max_tokens: Option<u32>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(provider: &'a dyn InferenceProvider, model: &'a str, max_tokens: Option<u32>) -> Self {
        Self {
            provider,
            model,
            max_tokens,
        }
    }

    /// Returns the model's text untouched.
    pub async fn synthesize(
        &self,
        query: &str,
        results: &ExecutionResults,
    ) -> Result<(String, Usage), InferenceError> {
        let request = InferenceRequest::user(self.model, synthesis_prompt(query, results))
            .with_max_tokens(self.max_tokens);

        let response = self.provider.infer(request).await?;
        if response.stop_reason == StopReason::MaxTokens {
            warn!("report truncated at max_tokens");
        }

        Ok((response.text, response.usage))
    }
}

/// One labeled block per tool, blank line between blocks.
pub fn results_block(results: &ExecutionResults) -> String {
    results
        .iter()
        .map(|(name, outcome)| format!("--- {name} result ---\n{}", outcome_text(outcome)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn synthesis_prompt(query: &str, results: &ExecutionResults) -> String {
    format!(
        "You are a professional report writer. Using the user's original request and the \
results of each tool below, write a fluent, coherent and friendly final report. Output the \
report itself, with no preamble such as \"Sure, here is your report\".

[Original request]
{query}

[Tool results]
{}

[Final report]
",
        results_block(results)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;

    fn sample_results() -> ExecutionResults {
        let mut results = ExecutionResults::new();
        results.insert("get_weather", Ok("Weather in Beijing: clear".to_string()));
        results.insert("get_news", Err(ToolError::NotFound("get_news".into())));
        results
    }

    #[test]
    fn results_block_labels_each_tool() {
        let block = results_block(&sample_results());
        assert_eq!(
            block,
            "--- get_weather result ---\nWeather in Beijing: clear\n\n\
             --- get_news result ---\nError: no tool named 'get_news' is registered"
        );
    }

    #[test]
    fn prompt_embeds_request_and_results() {
        let prompt = synthesis_prompt("morning briefing please", &sample_results());
        assert!(prompt.contains("[Original request]\nmorning briefing please"));
        assert!(prompt.contains("Weather in Beijing: clear"));
        assert!(prompt.contains("Error: no tool named 'get_news' is registered"));
        assert!(prompt.trim_end().ends_with("[Final report]"));
    }
}
