pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod inference;
pub mod planner;
pub mod synthesizer;
pub mod tools;
pub mod types;

use std::fmt;

use tokio::sync::mpsc::Sender;
use tracing::info;

pub use config::EnvConfig;
pub use error::{AgentError, ConfigError, InferenceError, ToolError};
pub use events::AgentEvent;
pub use executor::{ExecutionResults, Executor};
pub use inference::{InferenceProvider, OpenAiProvider};
pub use planner::{Plan, PlanRejection, PlanStep, Planner};
pub use synthesizer::Synthesizer;
pub use tools::{NewsTool, Params, Tool, ToolOutcome, ToolRegistry, WeatherTool};
pub use types::{InferenceRequest, InferenceResponse, ResponseFormat, StopReason, Usage};

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: String,
    /// Output cap for each completion call. `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "glm-4-flash".into(),
            max_tokens: None,
        }
    }
}

/// Why a run stopped after planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The model returned a well-formed, empty plan.
    NoToolsNeeded,
    /// The model's reply could not be parsed as a plan.
    UnparsablePlan(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoToolsNeeded => write!(f, "the plan is empty, no tool was requested"),
            AbortReason::UnparsablePlan(reason) => {
                write!(f, "could not produce a valid plan: {reason}")
            }
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub plan: Vec<PlanStep>,
    pub results: ExecutionResults,
    pub report: String,
    pub usage: Usage,
}

/// Result of an agent invocation.
#[derive(Debug)]
pub enum RunOutcome {
    Aborted { reason: AbortReason },
    Completed(RunReport),
}

/// The agent. Plans with the model, runs the tools, asks the model for a
/// report. One pass per request, strictly in that order.
pub struct Agent {
    provider: Box<dyn InferenceProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Agent {
    pub fn new(
        provider: impl InferenceProvider + 'static,
        tools: ToolRegistry,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            tools,
            config,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Simple invocation.
    pub async fn invoke(&self, query: &str) -> Result<RunOutcome, AgentError> {
        self.run(query, None).await
    }

    /// Invocation with progress events.
    pub async fn invoke_streaming(
        &self,
        query: &str,
        tx: Sender<AgentEvent>,
    ) -> Result<RunOutcome, AgentError> {
        self.run(query, Some(tx)).await
    }

    async fn run(
        &self,
        query: &str,
        tx: Option<Sender<AgentEvent>>,
    ) -> Result<RunOutcome, AgentError> {
        let mut usage = Usage::default();
        let model = self.config.model.as_str();

        info!(query, tools = self.tools.len(), "planning");
        emit(&tx, AgentEvent::PlanningStarted {
            query: query.to_string(),
        })
        .await;

        let planner = Planner::new(&*self.provider, &self.tools, model, self.config.max_tokens);
        let (plan, plan_usage) = planner.plan(query).await?;
        usage.accumulate(&plan_usage);

        if plan.is_empty() {
            let reason = match plan.rejected {
                Some(rejection) => {
                    emit(&tx, AgentEvent::PlanRejected {
                        reason: rejection.reason.clone(),
                        raw: rejection.raw,
                    })
                    .await;
                    AbortReason::UnparsablePlan(rejection.reason)
                }
                None => AbortReason::NoToolsNeeded,
            };
            info!(%reason, "no executable plan, stopping");
            emit(&tx, AgentEvent::Aborted {
                reason: reason.to_string(),
            })
            .await;
            return Ok(RunOutcome::Aborted { reason });
        }

        info!(steps = plan.steps.len(), "executing plan");
        emit(&tx, AgentEvent::Planned {
            steps: plan.steps.clone(),
        })
        .await;

        let results = Executor::new(&self.tools)
            .execute(&plan.steps, tx.as_ref())
            .await;

        info!(results = results.len(), "synthesizing report");
        emit(&tx, AgentEvent::Synthesizing).await;

        let synthesizer = Synthesizer::new(&*self.provider, model, self.config.max_tokens);
        let (report, report_usage) = synthesizer.synthesize(query, &results).await?;
        usage.accumulate(&report_usage);

        emit(&tx, AgentEvent::Report {
            text: report.clone(),
        })
        .await;
        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "run complete"
        );

        Ok(RunOutcome::Completed(RunReport {
            plan: plan.steps,
            results,
            report,
            usage,
        }))
    }
}

async fn emit(tx: &Option<Sender<AgentEvent>>, event: AgentEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event).await;
    }
}
