use crate::shop::{ProductSearch, SearchFilters};
use crate::tools::{extract_f64_arg_opt, extract_string_arg, extract_string_arg_opt};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct SearchProductsTool {
    search: Arc<ProductSearch>,
}

impl SearchProductsTool {
    pub fn new(search: Arc<ProductSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &str {
        "SearchProducts"
    }

    fn description(&self) -> &str {
        "Search for fashion products across multiple e-commerce websites. Also provides the url of the product"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for, e.g. 'red running shoes'"
                },
                "min_price": {
                    "type": "number",
                    "description": "Lowest acceptable price"
                },
                "max_price": {
                    "type": "number",
                    "description": "Highest acceptable price"
                },
                "size": {
                    "type": "string",
                    "description": "Required size"
                },
                "color": {
                    "type": "string",
                    "description": "Required color"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let query = extract_string_arg(&args, "query")?;
        let filters = SearchFilters {
            min_price: extract_f64_arg_opt(&args, "min_price"),
            max_price: extract_f64_arg_opt(&args, "max_price"),
            size: extract_string_arg_opt(&args, "size"),
            color: extract_string_arg_opt(&args, "color"),
        };

        let products = self.search.search(&query, &filters).await;

        ToolResult::json(&products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::search::tests::{FakeStoreClient, amazon_page};

    fn tool() -> SearchProductsTool {
        let client = FakeStoreClient::default()
            .with_page("amazon.com", amazon_page(&[("parka", "120"), ("fleece", "45")]));
        SearchProductsTool::new(Arc::new(ProductSearch::new(Arc::new(client))))
    }

    #[tokio::test]
    async fn returns_products_as_json() {
        let result = tool().execute(json!({"query": "winter jacket"})).await.unwrap();
        assert!(result.success);

        let products: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(products[0]["name"], "fleece");
        assert_eq!(products[0]["url"], "https://www.amazon.com/dp/fleece");
        assert_eq!(products[1]["price"], 120.0);
    }

    #[tokio::test]
    async fn passes_price_filter() {
        let result = tool()
            .execute(json!({"query": "jacket", "max_price": "50"}))
            .await
            .unwrap();
        let products: Vec<serde_json::Value> = serde_json::from_str(&result.output).unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn reports_empty_results() {
        let result = tool()
            .execute(json!({"query": "jacket", "min_price": 500}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "[]");
    }

    #[tokio::test]
    async fn query_is_required() {
        assert!(tool().execute(json!({})).await.is_err());
    }
}
