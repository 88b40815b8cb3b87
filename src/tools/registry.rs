use super::handler::{Params, Tool, ToolOutcome};
use crate::error::ToolError;

/// Catalog of available tools. Stores tools in registration order, renders
/// the catalog the planner sees, and looks up tools by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. A tool with the same name replaces the earlier one
    /// in place.
    pub fn add(mut self, tool: impl Tool + 'static) -> Self {
        let tool: Box<dyn Tool> = Box::new(tool);
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| &**t)
    }

    /// Execute a tool by name. Unknown names yield `ToolError::NotFound`.
    pub async fn execute(&self, name: &str, params: &Params) -> ToolOutcome {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(params).await
    }

    /// One line per tool: `- {name}: {description}`. Line breaks inside a
    /// description are folded so every tool stays on its own line.
    pub fn catalog(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                let description = t
                    .description()
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("- {}: {}", t.name(), description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
