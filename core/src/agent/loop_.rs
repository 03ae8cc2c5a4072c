use crate::agent::{ContextBuilder, ToolRegistry};
use crate::traits::{
    ChatMessage, ChatRequest, Memory, Provider, Role, ToolCall, ToolResult, Turn,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ITERATIONS: usize = 10;

const TOOL_CALL_OPEN_TAG: &str = "<tool_call>";
const TOOL_CALL_CLOSE_TAG: &str = "</tool_call>";

/// Final answer of one user turn plus the tool calls that produced it.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub content: String,
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of provider round trips.
    pub iterations: usize,
}

impl AgentReply {
    pub fn calls_to<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a ToolCallRecord> {
        self.tool_calls.iter().filter(move |c| c.name == tool)
    }
}

#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: String,
    pub result: ToolResult,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    context_builder: ContextBuilder,
    tool_registry: Arc<ToolRegistry>,
    memory: Arc<dyn Memory>,
    max_iterations: usize,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        context_builder: ContextBuilder,
        tool_registry: Arc<ToolRegistry>,
        memory: Arc<dyn Memory>,
    ) -> Self {
        let context_builder = context_builder.with_tool_specs(tool_registry.specs());
        Self {
            provider,
            context_builder,
            tool_registry,
            memory,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn memory(&self) -> &Arc<dyn Memory> {
        &self.memory
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    pub async fn history(&self) -> Result<Vec<Turn>> {
        self.memory.turns().await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.memory.clear().await
    }

    /// Answers `message` with the stored conversation as context. The user
    /// and assistant turns are appended to memory only when the turn succeeds.
    pub async fn process(&self, message: &str) -> Result<AgentReply> {
        let history: Vec<ChatMessage> = self
            .memory
            .turns()
            .await?
            .iter()
            .map(Turn::to_message)
            .collect();

        let mut messages = self.context_builder.build_messages(history, message);
        let tools = self.tool_registry.specs();
        let mut records = Vec::new();
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            debug!("Agent iteration {}", iterations);

            let request = ChatRequest {
                messages: &messages,
                tools: if tools.is_empty() { None } else { Some(&tools) },
            };

            let response = self
                .provider
                .chat(request)
                .await
                .with_context(|| format!("{} request failed", self.provider.name()))?;

            let (assistant_text, tool_calls) = if response.has_tool_calls() {
                (response.text_or_empty().to_string(), response.tool_calls)
            } else if let Some(text) = &response.text {
                parse_tool_calls_fallback(text)
            } else {
                anyhow::bail!("Empty response from {}", self.provider.name());
            };

            if tool_calls.is_empty() {
                self.memory.append(Role::User, message).await?;
                self.memory.append(Role::Assistant, &assistant_text).await?;
                return Ok(AgentReply {
                    content: assistant_text,
                    tool_calls: records,
                    iterations,
                });
            }

            messages.push(ChatMessage::assistant_with_tool_calls(
                assistant_text,
                tool_calls.clone(),
            ));

            for tool_call in tool_calls {
                info!("Agent calling tool: {}", tool_call.name);
                debug!("Tool arguments: {}", tool_call.arguments);

                let result = match serde_json::from_str::<serde_json::Value>(&tool_call.arguments)
                {
                    Ok(args) => self.tool_registry.execute(&tool_call.name, args).await,
                    Err(e) => ToolResult::error(format!(
                        "Invalid arguments for {}: {}",
                        tool_call.name, e
                    )),
                };

                let content = if result.success {
                    result.output.clone()
                } else {
                    format!("Error: {}", result.display_text())
                };
                messages.push(ChatMessage::tool_result(tool_call.id.clone(), content));

                records.push(ToolCallRecord {
                    name: tool_call.name,
                    arguments: tool_call.arguments,
                    result,
                });
            }
        }

        anyhow::bail!(
            "Agent exceeded maximum iterations ({})",
            self.max_iterations
        )
    }
}

/// Extracts `<tool_call>{...}</tool_call>` blocks emitted by models without
/// native tool calling. Returns the remaining text and the parsed calls.
pub fn parse_tool_calls_fallback(response: &str) -> (String, Vec<ToolCall>) {
    let mut text_parts = Vec::new();
    let mut calls = Vec::new();
    let mut remaining = response;

    while let Some(start) = remaining.find(TOOL_CALL_OPEN_TAG) {
        let before = &remaining[..start];
        if !before.trim().is_empty() {
            text_parts.push(before.trim().to_string());
        }

        let after_open = &remaining[start + TOOL_CALL_OPEN_TAG.len()..];
        let Some(close_idx) = after_open.find(TOOL_CALL_CLOSE_TAG) else {
            remaining = &remaining[start..];
            break;
        };

        for value in extract_json_values(&after_open[..close_idx]) {
            if let Some(call) = parse_tool_call_value(&value, calls.len()) {
                calls.push(call);
            }
        }

        remaining = &after_open[close_idx + TOOL_CALL_CLOSE_TAG.len()..];
    }

    if !remaining.trim().is_empty() {
        text_parts.push(remaining.trim().to_string());
    }

    (text_parts.join("\n"), calls)
}

fn extract_json_values(text: &str) -> Vec<serde_json::Value> {
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start
                        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[s..=i])
                    {
                        values.push(value);
                    }
                    start = None;
                }
            }
            _ => {}
        }
    }

    values
}

/// `index` is the call's position in the response, so repeated identical
/// calls still get distinct ids.
fn parse_tool_call_value(value: &serde_json::Value, index: usize) -> Option<ToolCall> {
    let name = value.get("name")?.as_str()?.to_string();
    let arguments = match value.get("arguments") {
        Some(serde_json::Value::String(raw)) => raw.clone(),
        Some(args) => serde_json::to_string(args).ok()?,
        None => "{}".to_string(),
    };
    let digest = md5::compute(format!("{}:{}:{}", index, name, arguments).as_bytes());

    Some(ToolCall {
        id: format!("call_{:x}", digest),
        name,
        arguments,
    })
}
