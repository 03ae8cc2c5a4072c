use crate::shop::estimate_shipping;
use crate::tools::{extract_string_arg, extract_string_arg_opt};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

pub struct EstimateShippingTool {
    fixed_now: Option<DateTime<Utc>>,
}

impl EstimateShippingTool {
    pub fn new() -> Self {
        Self { fixed_now: None }
    }

    /// Pins the clock used for deadline arithmetic.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

impl Default for EstimateShippingTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EstimateShippingTool {
    fn name(&self) -> &str {
        "EstimateShipping"
    }

    fn description(&self) -> &str {
        "Get shipping estimates including cost and delivery time"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "product": {
                    "type": "string",
                    "description": "Product being shipped"
                },
                "zip_code": {
                    "type": "string",
                    "description": "Destination ZIP or postal code"
                },
                "target_date": {
                    "type": "string",
                    "description": "Date the item must arrive by, YYYY-MM-DD"
                }
            },
            "required": ["product", "zip_code"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let product = extract_string_arg(&args, "product")?;
        let zip_code = extract_string_arg(&args, "zip_code")?;

        let target = match extract_string_arg_opt(&args, "target_date") {
            Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(date) => Some(date.and_time(chrono::NaiveTime::MIN).and_utc()),
                Err(_) => {
                    return Ok(ToolResult::error(format!(
                        "Invalid target_date '{}': expected YYYY-MM-DD",
                        raw
                    )));
                }
            },
            None => None,
        };

        let estimate = estimate_shipping(&product, &zip_code, target, self.now());
        ToolResult::json(&estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tool() -> EstimateShippingTool {
        EstimateShippingTool::new().with_now(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn lists_all_options_without_deadline() {
        let result = tool()
            .execute(json!({"product": "boots", "zip_code": "02139"}))
            .await
            .unwrap();
        let estimate: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(estimate["available_options"].as_array().unwrap().len(), 3);
        assert!(estimate.get("meets_deadline").is_none());
    }

    #[tokio::test]
    async fn deadline_filters_options() {
        let result = tool()
            .execute(json!({"product": "boots", "zip_code": "02139", "target_date": "2024-06-05"}))
            .await
            .unwrap();
        let estimate: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(estimate["meets_deadline"], true);
        assert_eq!(estimate["cheapest_option"]["service"], "expedited");
    }

    #[tokio::test]
    async fn bad_date_is_a_tool_error() {
        let result = tool()
            .execute(json!({"product": "boots", "zip_code": "02139", "target_date": "next friday"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.display_text().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn zip_code_is_required() {
        assert!(tool().execute(json!({"product": "boots"})).await.is_err());
    }
}
