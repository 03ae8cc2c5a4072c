pub mod builder;
pub mod context;
pub mod loop_;
pub mod registry;
pub mod response;

pub use builder::build_agent;
pub use context::ContextBuilder;
pub use loop_::{AgentLoop, AgentReply, ToolCallRecord};
pub use registry::ToolRegistry;
pub use response::{FormattedResponse, format_response, process_query};
