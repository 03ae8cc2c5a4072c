use crate::shop::check_promo;
use crate::tools::{extract_f64_arg, extract_string_arg};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;

pub struct CheckPromoTool;

#[async_trait]
impl Tool for CheckPromoTool {
    fn name(&self) -> &str {
        "CheckPromoCode"
    }

    fn description(&self) -> &str {
        "Validate and calculate discounted prices with promo codes"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Promo code to validate"
                },
                "base_price": {
                    "type": "number",
                    "description": "Price before the discount"
                }
            },
            "required": ["code", "base_price"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let code = extract_string_arg(&args, "code")?;
        let base_price = extract_f64_arg(&args, "base_price")?;

        if !base_price.is_finite() || base_price < 0.0 {
            return Ok(ToolResult::error(format!(
                "base_price must be a non-negative amount, got {}",
                base_price
            )));
        }

        ToolResult::json(&check_promo(&code, base_price))
    }
}
