//! Daily briefing: plan tool calls with an LLM, run them, print the report.
//!
//! Usage:
//!   cargo run
//!
//! Reads ZHIPUAI_API_KEY, OPENWEATHER_API_KEY and NEWS_API_KEY from the
//! environment or a `.env` file. BRIEFING_MODEL and BRIEFING_BASE_URL
//! override the model and the OpenAI-compatible endpoint.

use briefing_agent::inference::openai::ZHIPU_BASE_URL;
use briefing_agent::{
    Agent, AgentConfig, AgentEvent, EnvConfig, NewsTool, OpenAiProvider, RunOutcome,
    ToolRegistry, WeatherTool,
};

const DEFAULT_REQUEST: &str = "Put together today's briefing for me. I need the weather in \
Beijing and the latest news about artificial intelligence.";

fn print_event(event: AgentEvent) {
    match event {
        AgentEvent::PlanningStarted { query } => {
            println!("Received request: {query}");
            println!("\n[Step 1: planning...]");
        }
        AgentEvent::PlanRejected { reason, raw } => {
            println!("  [plan unreadable] {reason}\n  raw output: {raw}");
        }
        AgentEvent::Aborted { reason } => {
            println!("  [planning failed] no executable plan: {reason}");
        }
        AgentEvent::Planned { steps } => {
            let pretty = serde_json::to_string_pretty(&steps).unwrap_or_default();
            println!("  [plan ready]\n{pretty}");
            println!("\n[Step 2: executing...]");
        }
        AgentEvent::ToolCall { name, params } => {
            println!(
                "  [running] {name} with params {}",
                serde_json::Value::Object(params)
            );
        }
        AgentEvent::ToolResult {
            name,
            output,
            is_error,
        } => {
            let tag = if is_error { "error" } else { "result" };
            let indented = output.replace('\n', "\n      ");
            println!("    - {name} ({tag}):\n      {indented}");
        }
        AgentEvent::Synthesizing => {
            println!("  [execution done]");
            println!("\n[Step 3: writing report...]");
        }
        AgentEvent::Report { text } => {
            let banner = "=".repeat(20);
            println!("  [report done]");
            println!("\n{banner} Final report {banner}");
            println!("{text}");
            println!("{}", "=".repeat(54));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .init();

    let env = EnvConfig::from_env()?;

    let base_url = env.base_url.unwrap_or_else(|| ZHIPU_BASE_URL.into());
    let model = env.model.unwrap_or_else(|| AgentConfig::default().model);

    let http = reqwest::Client::new();
    let provider = OpenAiProvider::new(base_url)
        .with_api_key(env.llm_api_key)
        .with_client(http.clone());

    let tools = ToolRegistry::new()
        .add(WeatherTool::new(env.weather_api_key).with_client(http.clone()))
        .add(NewsTool::new(env.news_api_key).with_client(http));

    let agent = Agent::new(
        provider,
        tools,
        AgentConfig {
            model,
            ..AgentConfig::default()
        },
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<AgentEvent>(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(event);
        }
    });

    let result = agent.invoke_streaming(DEFAULT_REQUEST, tx).await;
    printer.await.ok();

    if let RunOutcome::Completed(run) = result? {
        tracing::info!(
            input_tokens = run.usage.input_tokens,
            output_tokens = run.usage.output_tokens,
            "token usage"
        );
    }

    Ok(())
}
