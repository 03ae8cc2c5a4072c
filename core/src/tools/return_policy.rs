use crate::shop::get_return_policy;
use crate::tools::extract_string_arg;
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;

pub struct ReturnPolicyTool;

#[async_trait]
impl Tool for ReturnPolicyTool {
    fn name(&self) -> &str {
        "GetReturnPolicy"
    }

    fn description(&self) -> &str {
        "Get return policy details for a specific store"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "website": {
                    "type": "string",
                    "description": "Store domain, e.g. 'amazon.com'"
                }
            },
            "required": ["website"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let website = extract_string_arg(&args, "website")?;
        ToolResult::json(&get_return_policy(&website))
    }
}
