use crate::agent::{AgentLoop, AgentReply};
use serde::Serialize;
use tracing::error;

/// An answer split into the main text and the detail sections shown below it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedResponse {
    pub main_response: String,
    pub price_comparison: Option<String>,
    pub shipping: Option<String>,
    pub promo: Option<String>,
}

impl FormattedResponse {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            main_response: format!("Error: {}", message),
            ..Default::default()
        }
    }

    /// Titled sections that have content, in display order.
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("Price Comparison", &self.price_comparison),
            ("Shipping Options", &self.shipping),
            ("Promotion Details", &self.promo),
        ]
        .into_iter()
        .filter_map(|(title, body)| body.as_deref().map(|b| (title, b)))
        .collect()
    }
}

fn successful_outputs(reply: &AgentReply, tool: &str) -> Option<String> {
    let outputs: Vec<&str> = reply
        .calls_to(tool)
        .filter(|c| c.result.success && c.result.output.trim() != "[]")
        .map(|c| c.result.output.as_str())
        .collect();

    if outputs.is_empty() {
        None
    } else {
        Some(outputs.join("\n\n"))
    }
}

pub fn format_response(reply: &AgentReply) -> FormattedResponse {
    let mentions_comparison = reply.content.to_lowercase().contains("price comparison");

    let price_comparison = successful_outputs(reply, "ComparePrices").or_else(|| {
        if mentions_comparison {
            successful_outputs(reply, "SearchProducts")
        } else {
            None
        }
    });

    FormattedResponse {
        main_response: reply.content.clone(),
        price_comparison,
        shipping: successful_outputs(reply, "EstimateShipping"),
        promo: successful_outputs(reply, "CheckPromoCode"),
    }
}

/// Runs one user query. Failures are reported in the response instead of
/// being returned, so a front end can always render something.
pub async fn process_query(agent: &AgentLoop, query: &str) -> FormattedResponse {
    match agent.process(query).await {
        Ok(reply) => format_response(&reply),
        Err(e) => {
            error!("Query failed: {:#}", e);
            FormattedResponse::error(format!("{:#}", e))
        }
    }
}
