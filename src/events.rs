use crate::planner::PlanStep;
use crate::tools::Params;

/// Events emitted during a run, for progress output.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    PlanningStarted { query: String },
    Planned { steps: Vec<PlanStep> },
    PlanRejected { reason: String, raw: String },
    ToolCall { name: String, params: Params },
    ToolResult { name: String, output: String, is_error: bool },
    Synthesizing,
    Report { text: String },
    Aborted { reason: String },
}
