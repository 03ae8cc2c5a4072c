use crate::config::Config;
use crate::providers::{OllamaProvider, OpenAIProvider};
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::sync::Arc;

const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "SHOPWISE_OPENAI_API_KEY"];

pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    match config.provider.to_lowercase().as_str() {
        "" | "ollama" => {
            let mut provider = OllamaProvider::new()
                .with_model(config.model.clone())
                .with_temperature(config.temperature);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        "openai" => {
            let api_key = resolve_api_key(OPENAI_KEY_VARS, &config.api_key, |var| {
                std::env::var(var).ok()
            })?;
            let mut provider = OpenAIProvider::new(api_key)
                .with_model(config.model.clone())
                .with_temperature(config.temperature);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        other => Err(anyhow!(
            "Unknown provider: {}. Available: ollama, openai",
            other
        )),
    }
}

/// Environment variables win over the configured key.
fn resolve_api_key(
    env_vars: &[&str],
    config_key: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    for var_name in env_vars {
        if let Some(key) = lookup(var_name).filter(|k| !k.trim().is_empty()) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or add api_key to the config.",
            env_vars.join(" or ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_ollama() {
        let provider = create_provider(&Config::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn openai_with_configured_key() {
        let config = Config {
            provider: "OpenAI".into(),
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            ..Config::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = Config {
            provider: "bard".into(),
            ..Config::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider: bard"));
    }

    #[test]
    fn env_key_takes_precedence() {
        let key = resolve_api_key(OPENAI_KEY_VARS, "from-config", |var| {
            (var == "SHOPWISE_OPENAI_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn falls_back_to_config_key() {
        let key = resolve_api_key(OPENAI_KEY_VARS, "from-config", |_| Some("  ".into())).unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = resolve_api_key(OPENAI_KEY_VARS, "", |_| None).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
