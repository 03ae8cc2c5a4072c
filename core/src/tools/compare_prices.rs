use crate::shop::ProductSearch;
use crate::tools::extract_string_arg;
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct ComparePricesTool {
    search: Arc<ProductSearch>,
}

impl ComparePricesTool {
    pub fn new(search: Arc<ProductSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for ComparePricesTool {
    fn name(&self) -> &str {
        "ComparePrices"
    }

    fn description(&self) -> &str {
        "Compare prices for a product across different stores"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "product_name": {
                    "type": "string",
                    "description": "Product to compare"
                }
            },
            "required": ["product_name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let product_name = extract_string_arg(&args, "product_name")?;
        let quotes = self.search.compare_prices(&product_name).await;


        ToolResult::json(&quotes)
    }
}
