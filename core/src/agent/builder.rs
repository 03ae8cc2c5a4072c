use crate::agent::{AgentLoop, ContextBuilder, ToolRegistry};
use crate::config::Config;
use crate::memory::create_memory;
use crate::providers::create_provider;
use crate::shop::{HttpStoreClient, ProductSearch};
use crate::tools::shopping_tools;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Wires the configured provider, the store scraper and the shopping tools
/// into a ready agent with an empty conversation.
pub fn build_agent(config: &Config) -> Result<AgentLoop> {
    let provider = create_provider(config)?;
    let client = HttpStoreClient::new(Duration::from_secs(config.request_timeout_secs.max(1)));
    let search = Arc::new(ProductSearch::new(Arc::new(client)));
    let registry = Arc::new(ToolRegistry::with_tools(shopping_tools(search)));

    info!(
        "Agent ready: provider={} model={} tools={}",
        provider.name(),
        config.model,
        registry.len()
    );

    Ok(AgentLoop::new(provider, ContextBuilder::new(), registry, create_memory())
        .with_max_iterations(config.max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_config_builds_shopping_agent() {
        let agent = build_agent(&Config::default()).unwrap();
        assert_eq!(
            agent.tool_registry().names(),
            vec![
                "SearchProducts",
                "EstimateShipping",
                "CheckPromoCode",
                "ComparePrices",
                "GetReturnPolicy"
            ]
        );
        assert!(agent.history().await.unwrap().is_empty());
    }

    #[test]
    fn bad_provider_fails_to_build() {
        let config = Config {
            provider: "nope".into(),
            ..Config::default()
        };
        assert!(build_agent(&config).is_err());
    }
}
