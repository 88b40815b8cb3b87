pub mod handler;
pub mod news;
pub mod registry;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_support;

pub use handler::{required_param, Params, Tool, ToolOutcome};
pub use news::NewsTool;
pub use registry::ToolRegistry;
pub use weather::WeatherTool;
