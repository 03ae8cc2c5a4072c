use crate::traits::{Tool, ToolResult, ToolSpec};
use std::sync::Arc;
use tracing::warn;

/// Name-to-tool table. Registration order is the order tools are offered to
/// the model.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    /// Adds `tool`, replacing any earlier tool with the same name in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => {
                warn!("Replacing already registered tool '{}'", tool.name());
                self.tools[idx] = tool;
            }
            None => self.tools.push(tool),
        }
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn execute(&self, name: &str, args: serde_json::Value) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return ToolResult::error(format!("Tool '{}' not found", name));
        };

        match tool.execute(args).await {
            Ok(result) => result,
            Err(e) => ToolResult::error(format!("Execution failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
            if args.get("fail").is_some() {
                anyhow::bail!("boom");
            }
            Ok(ToolResult::success(self.reply))
        }
    }

    fn echo(name: &'static str, reply: &'static str) -> Arc<dyn Tool> {
        Arc::new(Echo { name, reply })
    }

    #[tokio::test]
    async fn executes_by_name() {
        let registry = ToolRegistry::with_tools([echo("A", "a"), echo("B", "b")]);
        assert_eq!(registry.execute("B", json!({})).await.output, "b");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let registry = ToolRegistry::new();
        let result = registry.execute("Nope", json!({})).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Tool 'Nope' not found"));
    }

    #[tokio::test]
    async fn tool_errors_are_wrapped() {
        let registry = ToolRegistry::with_tools([echo("A", "a")]);
        let result = registry.execute("A", json!({"fail": true})).await;
        assert_eq!(result.error.as_deref(), Some("Execution failed: boom"));
    }

    #[tokio::test]
    async fn duplicate_name_replaces_in_place() {
        let registry = ToolRegistry::with_tools([echo("A", "old"), echo("B", "b"), echo("A", "new")]);
        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.execute("A", json!({})).await.output, "new");
    }

    #[test]
    fn specs_follow_registration_order() {
        let registry = ToolRegistry::with_tools([echo("Z", "z"), echo("A", "a")]);
        let names: Vec<_> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Z", "A"]);
        assert!(registry.contains("Z"));
        assert_eq!(registry.len(), 2);
    }
}
