use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

use crate::events::AgentEvent;
use crate::planner::PlanStep;
use crate::tools::{ToolOutcome, ToolRegistry};

/// Outcome per tool name, in plan order. A tool named twice keeps its first
/// position and its latest outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResults {
    entries: Vec<(String, ToolOutcome)>,
}

impl ExecutionResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, outcome: ToolOutcome) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((name, outcome)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolOutcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Display text for a tool's outcome; errors render as their message.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(outcome_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolOutcome)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub fn outcome_text(outcome: &ToolOutcome) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(e) => e.to_string(),
    }
}

/// Runs plan steps one after another against the registry.
pub struct Executor<'a> {
    tools: &'a ToolRegistry,
}

impl<'a> Executor<'a> {
    pub fn new(tools: &'a ToolRegistry) -> Self {
        Self { tools }
    }

    /// Execute every step. Never fails: unknown tools and tool errors are
    /// recorded as error outcomes and the remaining steps still run.
    pub async fn execute(
        &self,
        steps: &[PlanStep],
        tx: Option<&Sender<AgentEvent>>,
    ) -> ExecutionResults {
        let mut results = ExecutionResults::new();

        for step in steps {
            let name = step.tool_name.as_str();
            info!(tool = name, params = ?step.params, "calling tool");

            if let Some(tx) = tx {
                let _ = tx
                    .send(AgentEvent::ToolCall {
                        name: name.to_string(),
                        params: step.params.clone(),
                    })
                    .await;
            }

            let outcome = self.tools.execute(name, &step.params).await;
            if let Err(ref e) = outcome {
                warn!(tool = name, error = %e, "tool returned an error");
            }

            if let Some(tx) = tx {
                let _ = tx
                    .send(AgentEvent::ToolResult {
                        name: name.to_string(),
                        output: outcome_text(&outcome),
                        is_error: outcome.is_err(),
                    })
                    .await;
            }

            results.insert(name, outcome);
        }

        results
    }
}
