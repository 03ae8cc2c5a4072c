use crate::traits::{ChatMessage, ToolSpec};
use std::fmt::Write;

const SHOPPING_INSTRUCTIONS: &str = "You are a shopping assistant with access to real-time price data.

For ANY shopping query:
1. ALWAYS use SearchProducts first to find matching items
2. ALWAYS use ComparePrices to compare prices across stores
3. NEVER give generic advice - always show actual prices
4. ALWAYS include product links and availability

Use EstimateShipping for delivery costs and deadlines, CheckPromoCode to validate \
discount codes, and GetReturnPolicy for a store's return rules. Only quote prices, \
links and policies that a tool returned.";

pub struct ContextBuilder {
    pub instructions: String,
    pub tool_specs: Vec<ToolSpec>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            instructions: SHOPPING_INSTRUCTIONS.to_string(),
            tool_specs: vec![],
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_tool_specs(mut self, tool_specs: Vec<ToolSpec>) -> Self {
        self.tool_specs = tool_specs;
        self
    }

    pub fn build_system_prompt(&self) -> String {
        let mut parts = vec![self.instructions.clone()];

        let tools = self.get_tool_instructions();
        if !tools.is_empty() {
            parts.push(tools);
        }

        parts.push(self.get_runtime_context());

        parts.join("\n\n---\n\n")
    }

    fn get_tool_instructions(&self) -> String {
        if self.tool_specs.is_empty() {
            return String::new();
        }

        let mut instructions = String::new();
        instructions.push_str("## Tool Use Protocol\n\n");
        instructions.push_str(
            "Call tools through the function-calling interface when it is available. \
             Otherwise wrap a JSON object in <tool_call> tags:\n\n",
        );
        instructions.push_str("```\n<tool_call>\n{\"name\": \"SearchProducts\", \"arguments\": {\"query\": \"red sneakers\"}}\n</tool_call>\n```\n\n");
        instructions.push_str("You may use multiple tool calls in a single response. ");
        instructions.push_str("Tool results come back in <tool_result> tags. ");
        instructions
            .push_str("Continue reasoning with the results until you can give a final answer.\n\n");
        instructions.push_str("### Available Tools\n\n");

        for tool in &self.tool_specs {
            let _ = writeln!(
                instructions,
                "**{}**: {}\nParameters: `{}`\n",
                tool.name, tool.description, tool.parameters_schema
            );
        }

        instructions
    }

    fn get_runtime_context(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");
        format!("## Runtime Context\n\n### Current Time\n{}", timestamp)
    }

    /// `[system] + history + [user]`, history in conversational order.
    pub fn build_messages(
        &self,
        history: Vec<ChatMessage>,
        current_message: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.build_system_prompt())];
        messages.extend(history);
        messages.push(ChatMessage::user(current_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_contains_shopping_rules_and_tools() {
        let builder = ContextBuilder::new().with_tool_specs(vec![ToolSpec {
            name: "ComparePrices".into(),
            description: "Compare prices for a product across different stores".into(),
            parameters_schema: json!({"type": "object"}),
        }]);

        let prompt = builder.build_system_prompt();
        assert!(prompt.contains("ALWAYS use SearchProducts first"));
        assert!(prompt.contains("**ComparePrices**: Compare prices"));
        assert!(prompt.contains("## Runtime Context"));
    }

    #[test]
    fn no_tool_section_without_tools() {
        let prompt = ContextBuilder::new().build_system_prompt();
        assert!(!prompt.contains("Tool Use Protocol"));
    }

    #[test]
    fn messages_wrap_history() {
        let history = vec![
            ChatMessage::user("find loafers"),
            ChatMessage::assistant("Found 3 pairs"),
        ];
        let messages = ContextBuilder::new().build_messages(history, "which is cheapest?");

        let roles: Vec<_> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[3].content, "which is cheapest?");
    }
}
