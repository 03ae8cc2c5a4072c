use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use shopwise_core::config::Config;
use shopwise_core::providers::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use shopwise_core::providers::openai::DEFAULT_OPENAI_URL;

const BANNER: &str = r"
    -------------------------------------

     ___ _  _  ___  ___ __      __ ___  ___  ___
    / __| || |/ _ \| _ \\ \    / /|_ _|/ __|| __|
    \__ \ __ | (_) |  _/ \ \/\/ /  | | \__ \| _|
    |___/_||_|\___/|_|    \_/\_/  |___||___/|___|

    -------------------------------------
";

const PROVIDERS: &[&str] = &["ollama", "openai"];
const OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your model provider")
        .items(PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection].to_string())
}

fn setup_model(provider: &str) -> Result<String> {
    if provider == "openai" {
        let selection = Select::new()
            .with_prompt("Select your model")
            .items(OPENAI_MODELS)
            .default(0)
            .interact()
            .context("Failed to select model")?;
        return Ok(OPENAI_MODELS[selection].to_string());
    }

    let model: String = Input::new()
        .with_prompt("Ollama model")
        .default(DEFAULT_OLLAMA_MODEL.to_string())
        .interact_text()
        .context("Failed to read model name")?;

    Ok(model.trim().to_string())
}

fn setup_api_key(provider: &str) -> Result<String> {
    if provider != "openai" {
        return Ok(String::new());
    }

    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key (leave empty to use OPENAI_API_KEY)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read API key")?;

    Ok(api_key.trim().to_string())
}

fn setup_base_url(provider: &str) -> Result<Option<String>> {
    let default_url = match provider {
        "openai" => DEFAULT_OPENAI_URL,
        _ => DEFAULT_OLLAMA_URL,
    };

    let base_url: String = Input::new()
        .with_prompt("API base URL")
        .default(default_url.to_string())
        .interact_text()
        .context("Failed to read base URL")?;

    let base_url = base_url.trim();
    if base_url.is_empty() || base_url == default_url {
        Ok(None)
    } else {
        Ok(Some(base_url.to_string()))
    }
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to Shopwise!").white().bold());
    println!(
        "  {}",
        style("Pick the model that will search stores and compare prices for you.").dim()
    );
    println!();

    print_step(1, 3, "Provider");
    let provider = setup_provider()?;

    print_step(2, 3, "Model");
    let model = setup_model(&provider)?;
    let api_key = setup_api_key(&provider)?;

    print_step(3, 3, "Endpoint");
    let base_url = setup_base_url(&provider)?;

    let config = Config {
        provider,
        api_key,
        base_url,
        model,
        ..Default::default()
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(shopwise_core::config::get_config_path().display()).cyan()
    );
    println!();
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("shopwise chat").cyan().bold()
    );
    println!();

    Ok(config)
}
