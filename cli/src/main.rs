use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use shopwise_core::{AgentLoop, FormattedResponse, agent, config};
use termimad::MadSkin;
use tracing_subscriber::EnvFilter;

mod onboard;

#[derive(Parser)]
#[command(name = "shopwise")]
#[command(about = "shopwise - Shopping assistant that searches stores and compares prices", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure provider and model
    Init,
    /// Ask a single question, or start an interactive session
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List the tools available to the assistant
    Tools,
}

enum ReplCommand<'a> {
    History,
    Clear,
    Exit,
    Query(&'a str),
}

fn parse_repl_command(input: &str) -> ReplCommand<'_> {
    match input.to_lowercase().as_str() {
        "/history" => ReplCommand::History,
        "/clear" => ReplCommand::Clear,
        "/exit" | "/quit" => ReplCommand::Exit,
        _ => ReplCommand::Query(input),
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("shopwise_core={level},shopwise={level}"));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_response(skin: &MadSkin, response: &FormattedResponse) {
    skin.print_text(&response.main_response);
    for (title, body) in response.sections() {
        println!();
        println!("{}", style(title).cyan().bold());
        println!("{}", body);
    }
    println!();
}

async fn print_history(agent_loop: &AgentLoop) -> Result<()> {
    let turns = agent_loop.history().await?;
    if turns.is_empty() {
        println!("{}", style("No messages yet.").dim());
        return Ok(());
    }

    for turn in turns {
        let label = match turn.role {
            shopwise_core::Role::User => style("You").green().bold(),
            shopwise_core::Role::Assistant => style("Assistant").cyan().bold(),
        };
        println!("{} {}: {}", style(turn.at.format("%H:%M")).dim(), label, turn.text);
    }
    println!();
    Ok(())
}

async fn run_repl(agent_loop: &AgentLoop, skin: &MadSkin) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let history_path = config::ensure_shopwise_dir()
        .ok()
        .map(|_| config::get_history_path());
    if let Some(path) = &history_path
        && rl.load_history(path).is_err()
    {
        tracing::debug!("No previous history at {}", path.display());
    }

    println!("{}", style("🛍  Shopwise").bold());
    println!(
        "{}\n",
        style("Ask about products, prices, shipping, promo codes or returns. /history, /clear, /exit").dim()
    );

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                match parse_repl_command(input) {
                    ReplCommand::History => print_history(agent_loop).await?,
                    ReplCommand::Clear => {
                        agent_loop.clear_history().await?;
                        println!("{}\n", style("Chat history cleared.").dim());
                    }
                    ReplCommand::Exit => break,
                    ReplCommand::Query(query) => {
                        println!("\n{}\n", style("🔎 Searching...").dim());
                        let response = agent::process_query(agent_loop, query).await;
                        print_response(skin, &response);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history_path
        && let Err(e) = rl.save_history(path)
    {
        tracing::warn!("Could not save history to {}: {}", path.display(), e);
    }

    println!("\n👋 Goodbye!");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Init
        } else {
            Commands::Chat { message: None }
        }
    });

    let settings = match command {
        Commands::Init => config::Config::default(),
        Commands::Tools => config::Config::load_or_default()?,
        Commands::Chat { .. } => config::load_config()?,
    };
    init_logging(cli.verbose, &settings.log_level);

    match command {
        Commands::Init => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Setup failed: {}", e);
                anyhow::anyhow!("Setup failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Tools => {
            let agent_loop = agent::build_agent(&settings)?;
            for spec in agent_loop.tool_registry().specs() {
                println!("{}", style(&spec.name).cyan().bold());
                println!("  {}", spec.description);
            }
        }
        Commands::Chat { message } => {
            let agent_loop = agent::build_agent(&settings)?;
            let skin = MadSkin::default();

            if let Some(msg) = message {
                println!("\n{}\n", style("🔎 Searching...").dim());
                let response = agent::process_query(&agent_loop, &msg).await;
                print_response(&skin, &response);
                if response.main_response.starts_with("Error: ") {
                    anyhow::bail!("Query failed");
                }
            } else {
                run_repl(&agent_loop, &skin).await?;
            }
        }
    }

    Ok(())
}
