pub mod agent;
pub mod config;
pub mod memory;
pub mod providers;
pub mod shop;
pub mod tools;
pub mod traits;

pub use agent::{
    AgentLoop, AgentReply, ContextBuilder, FormattedResponse, ToolRegistry, build_agent,
    process_query,
};
pub use config::Config;
pub use memory::{BufferMemory, create_memory};
pub use providers::{OllamaProvider, OpenAIProvider, create_provider};
pub use shop::{Product, ProductSearch, SearchFilters};
pub use tools::shopping_tools;
pub use traits::*;
