use crate::shop::ProductSearch;
use crate::traits::Tool;
use serde_json::Value;
use std::sync::Arc;

pub mod check_promo;
pub mod compare_prices;
pub mod estimate_shipping;
pub mod return_policy;
pub mod search_products;

pub use check_promo::CheckPromoTool;
pub use compare_prices::ComparePricesTool;
pub use estimate_shipping::EstimateShippingTool;
pub use return_policy::ReturnPolicyTool;
pub use search_products::SearchProductsTool;

/// The assistant's tool set, in the order it is offered to the model.
pub fn shopping_tools(search: Arc<ProductSearch>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchProductsTool::new(search.clone())),
        Arc::new(EstimateShippingTool::new()),
        Arc::new(CheckPromoTool),
        Arc::new(ComparePricesTool::new(search)),
        Arc::new(ReturnPolicyTool),
    ]
}

pub fn extract_string_arg(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

pub fn extract_string_arg_opt(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Models sometimes send numbers as strings ("49.99"), so both are accepted.
pub fn extract_f64_arg_opt(args: &Value, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }
}

pub fn extract_f64_arg(args: &Value, key: &str) -> anyhow::Result<f64> {
    extract_f64_arg_opt(args, key).ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
}
