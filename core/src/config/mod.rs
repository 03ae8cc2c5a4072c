use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SHOPWISE_DIR: &str = ".shopwise";
const SHOPWISE_HOME_ENV: &str = "SHOPWISE_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_iterations: usize,
    /// Timeout for each store page fetch.
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: "ollama".to_string(),
            api_key: String::new(),
            base_url: None,
            model: "mistral".to_string(),
            temperature: 1.0,
            max_iterations: 10,
            request_timeout_secs: 10,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }
}

pub fn get_shopwise_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(SHOPWISE_HOME_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SHOPWISE_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_shopwise_dir().join("config.toml")
}

pub fn get_history_path() -> PathBuf {
    get_shopwise_dir().join("history.txt")
}

pub fn ensure_shopwise_dir() -> Result<PathBuf> {
    let dir = get_shopwise_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create shopwise directory at {}", dir.display())
        })?;
    }

    Ok(dir)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'shopwise init' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_shopwise_dir()?;
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_to_local_ollama() {
        let config = Config::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.temperature, 1.0);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "model = \"llama3.2\"\nmax_iterations = 4\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            provider: "openai".into(),
            base_url: Some("http://127.0.0.1:8080/v1".into()),
            ..Default::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_points_to_init() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("shopwise init"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
